//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the motion and lighting controllers and exposes a
//! clean, hardware-agnostic API: commands go in through
//! [`handle_command`](AppService::handle_command), time goes in through
//! [`tick`](AppService::tick), and physical output flows out through the
//! port traits injected at the call sites.
//!
//! ```text
//!   Command ──▶ ┌──────────────────────┐ ──▶ EventSink
//!               │      AppService       │
//!   CoilPort ◀──│  motion  ·  lighting  │──▶ StripPort / AudioPort
//!               └──────────────────────┘
//! ```
//!
//! Each iteration of the control loop drains pending commands into
//! `handle_command`, then calls `tick` once.  The service never sleeps,
//! never blocks, and never panics — it is total over every command and
//! clock value.

use log::info;

use super::commands::Command;
use super::events::AppEvent;
use super::light::{self, LightController, LightMode};
use super::motion::MotionController;
use super::ports::{AudioPort, CoilPort, EventSink, StripPort};

/// The application service orchestrates all domain logic.
pub struct AppService {
    motion: MotionController,
    light: LightController,
}

impl AppService {
    pub fn new() -> Self {
        Self {
            motion: MotionController::new(),
            light: LightController::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every actuator into its resting state and announce readiness.
    ///
    /// Safe to call on hardware in any condition: the coil release is
    /// idempotent and the strip clear overwrites whatever a previous
    /// boot left behind.
    pub fn start(&mut self, hw: &mut (impl CoilPort + StripPort), sink: &mut impl EventSink) {
        self.motion.halt(hw);
        hw.clear();
        hw.flush();
        sink.emit(&AppEvent::Started);
        info!("AppService started (coils released, strips dark)");
    }

    // ── Command dispatch ──────────────────────────────────────

    /// Apply one command to the domain state.
    ///
    /// Total over [`Command`] — unknown input never reaches this point
    /// because both channels parse before enqueueing.  The `hw` parameter
    /// satisfies all three actuator ports; one generic parameter avoids
    /// a double mutable borrow while keeping the boundary explicit.
    pub fn handle_command(
        &mut self,
        command: Command,
        hw: &mut (impl CoilPort + StripPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::CommandApplied(command));

        let motion_was_running = self.motion.is_running();
        let light_mode_before = self.light.mode();

        match command {
            Command::White => self.light.arm_solid(light::WHITE),
            Command::Red => self.light.arm_solid(light::RED),
            Command::Orange => self.light.arm_solid(light::ORANGE),
            Command::Yellow => self.light.arm_solid(light::YELLOW),
            Command::Green => self.light.arm_solid(light::GREEN),
            Command::Cyan => self.light.arm_solid(light::CYAN),
            Command::Blue => self.light.arm_solid(light::BLUE),
            Command::Purple => self.light.arm_solid(light::PURPLE),
            Command::Pink => self.light.arm_solid(light::PINK),
            Command::Water => self.light.water(),
            Command::LightsOff => self.light.off(hw),
            Command::AudioOn => {
                hw.audio_begin();
                hw.audio_reconnect();
                sink.emit(&AppEvent::AudioLinkRequested);
            }
            Command::Rotate => self.motion.start(),
            Command::Stop => self.motion.halt(hw),
        }

        if self.motion.is_running() != motion_was_running {
            sink.emit(&AppEvent::MotionChanged {
                running: self.motion.is_running(),
            });
        }
        if self.light.mode() != light_mode_before {
            sink.emit(&AppEvent::LightChanged {
                mode: self.light.mode(),
            });
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one scheduler pass: let each controller check its own
    /// elapsed-time gate against `now_ms` and act if due.
    pub fn tick(&mut self, now_ms: u32, hw: &mut (impl CoilPort + StripPort)) {
        if self.motion.is_running() {
            self.motion.tick(now_ms, hw);
        }
        if self.light.mode() != LightMode::Idle {
            self.light.tick(now_ms, hw);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Whether the stepper drive sequence is active.
    pub fn motor_running(&self) -> bool {
        self.motion.is_running()
    }

    /// Raw phase counter of the stepper drive sequence.
    pub fn motor_phase(&self) -> u32 {
        self.motion.phase_index()
    }

    /// Current lighting mode.
    pub fn light_mode(&self) -> LightMode {
        self.light.mode()
    }
}

impl Default for AppService {
    fn default() -> Self {
        Self::new()
    }
}
