//! Stepper motion controller.
//!
//! State machine over {Stopped, Running}. The scheduler calls `tick()`
//! every loop iteration; an elapsed-time gate inside the controller holds
//! the step cadence at one phase advance per `STEP_INTERVAL_MS`,
//! independent of loop rate.
//!
//! ## Drive sequence
//!
//! | phase mod 4 | A   | B    | C    | D    |
//! |-------------|-----|------|------|------|
//! | 0           | low | low  | low  | HIGH |
//! | 1           | low | low  | HIGH | low  |
//! | 2           | low | HIGH | low  | low  |
//! | 3           | low | low  | low  | low  |
//!
//! Three energized quarter-steps and one null phase, with line A held low
//! throughout. The head mechanism is geared and tuned to exactly this
//! sequence — do not "fix" it into a textbook full-step table.

use super::ports::CoilPort;

/// Minimum elapsed time between phase advances.
pub const STEP_INTERVAL_MS: u32 = 10;

/// Levels for the four coil lines during one drive phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilPattern {
    pub a: bool,
    pub b: bool,
    pub c: bool,
    pub d: bool,
}

impl CoilPattern {
    /// All lines low — the motor holds no torque.
    pub const OFF: Self = Self {
        a: false,
        b: false,
        c: false,
        d: false,
    };

    /// True when no coil line is driven.
    pub fn is_de_energized(self) -> bool {
        self == Self::OFF
    }
}

/// The drive table, indexed by `phase_index % 4`.
pub const DRIVE_SEQUENCE: [CoilPattern; 4] = [
    CoilPattern {
        a: false,
        b: false,
        c: false,
        d: true,
    },
    CoilPattern {
        a: false,
        b: false,
        c: true,
        d: false,
    },
    CoilPattern {
        a: false,
        b: true,
        c: false,
        d: false,
    },
    CoilPattern::OFF,
];

/// Owns the motor's run flag, phase counter, and step timer.
/// Stack-allocated; all hardware access goes through [`CoilPort`].
pub struct MotionController {
    running: bool,
    /// Raw phase counter; reduced mod 4 when indexing the drive table.
    /// 2^32 is a multiple of 4, so the sequence stays coherent across wrap.
    phase_index: u32,
    last_step_ms: u32,
}

impl MotionController {
    pub fn new() -> Self {
        Self {
            running: false,
            phase_index: 0,
            last_step_ms: 0,
        }
    }

    /// Begin (or restart) rotation. Resets the phase and clears the step
    /// timer so the next `tick` fires without waiting a full interval.
    pub fn start(&mut self) {
        self.running = true;
        self.phase_index = 0;
        self.last_step_ms = 0;
    }

    /// Stop rotation and synchronously de-energize every coil line.
    ///
    /// Deliberately unconditional: calling `halt` on an already-stopped
    /// motor drives the lines low again. A stopped stepper left energized
    /// cooks its windings, so the release is treated as a safety action,
    /// not a state transition.
    pub fn halt(&mut self, coils: &mut impl CoilPort) {
        self.running = false;
        coils.release_coils();
    }

    /// Advance the drive sequence if running and the step interval has
    /// elapsed. Total over all states; never errors.
    pub fn tick(&mut self, now_ms: u32, coils: &mut impl CoilPort) {
        if !self.running {
            return;
        }
        // Wrapping subtraction keeps the gate correct across u32 rollover.
        if now_ms.wrapping_sub(self.last_step_ms) < STEP_INTERVAL_MS {
            return;
        }

        coils.apply_coils(DRIVE_SEQUENCE[(self.phase_index % 4) as usize]);
        self.phase_index = self.phase_index.wrapping_add(1);
        self.last_step_ms = now_ms;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase_index(&self) -> u32 {
        self.phase_index
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new()
    }
}
