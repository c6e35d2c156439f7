//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/RMT peripherals.  A shadow
//! framebuffer tracks staged pixels so tests can check what each flush
//! put on the physical strip pair.

use rgb::RGB8;
use towerfw::app::events::AppEvent;
use towerfw::app::motion::CoilPattern;
use towerfw::app::ports::{AudioPort, CoilPort, EventSink, StripPort};

/// Pixel count of the simulated strip pair.
pub const STRIP_LEN: usize = 14;

pub const BLACK: RGB8 = RGB8::new(0, 0, 0);

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    ApplyCoils(CoilPattern),
    ReleaseCoils,
    StripClear,
    SetPixel { index: usize, color: RGB8 },
    StripFlush,
    AudioBegin,
    AudioReconnect,
    SetVolume(f32),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Staged pixels, as the next flush would show them.
    pub pixels: [RGB8; STRIP_LEN],
    /// Every flushed frame, oldest first.
    pub frames: Vec<[RGB8; STRIP_LEN]>,
    /// Coil lines as last driven.
    pub coils: CoilPattern,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pixels: [BLACK; STRIP_LEN],
            frames: Vec::new(),
            coils: CoilPattern::OFF,
        }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// True while any coil line is driven high.
    pub fn coils_energized(&self) -> bool {
        !self.coils.is_de_energized()
    }

    /// True if line A was ever driven high.  The head mechanism requires
    /// this to stay false across every drive sequence.
    pub fn line_a_ever_high(&self) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, ActuatorCall::ApplyCoils(p) if p.a))
    }

    pub fn step_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::ApplyCoils(_)))
            .count()
    }

    pub fn last_frame(&self) -> Option<&[RGB8; STRIP_LEN]> {
        self.frames.last()
    }

    /// True when the most recent flush showed `color` on every pixel.
    pub fn showing_solid(&self, color: RGB8) -> bool {
        self.last_frame()
            .is_some_and(|frame| frame.iter().all(|&px| px == color))
    }

    pub fn flush_count(&self) -> usize {
        self.frames.len()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl CoilPort for MockHardware {
    fn apply_coils(&mut self, pattern: CoilPattern) {
        self.coils = pattern;
        self.calls.push(ActuatorCall::ApplyCoils(pattern));
    }

    fn release_coils(&mut self) {
        self.coils = CoilPattern::OFF;
        self.calls.push(ActuatorCall::ReleaseCoils);
    }
}

impl StripPort for MockHardware {
    fn strip_len(&self) -> usize {
        STRIP_LEN
    }

    fn clear(&mut self) {
        self.pixels = [BLACK; STRIP_LEN];
        self.calls.push(ActuatorCall::StripClear);
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = color;
        }
        self.calls.push(ActuatorCall::SetPixel { index, color });
    }

    fn flush(&mut self) {
        self.frames.push(self.pixels);
        self.calls.push(ActuatorCall::StripFlush);
    }
}

impl AudioPort for MockHardware {
    fn audio_begin(&mut self) {
        self.calls.push(ActuatorCall::AudioBegin);
    }

    fn audio_reconnect(&mut self) {
        self.calls.push(ActuatorCall::AudioReconnect);
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(ActuatorCall::SetVolume(volume));
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// True if any emitted event's debug form contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}
