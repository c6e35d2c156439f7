//! Hardware adapter — bridges real actuators to the domain port traits.
//!
//! Owns the coil driver, both LED strips, and the audio link, exposing
//! them through [`CoilPort`], [`StripPort`] and [`AudioPort`]. This is
//! the only module that hands real peripherals to the app service; on
//! non-espidf targets the underlying drivers run as simulation stubs.

use log::warn;
use rgb::RGB8;

use super::audio::AudioLink;
use crate::app::motion::CoilPattern;
use crate::app::ports::{AudioPort, CoilPort, StripPort};
use crate::drivers::coils::CoilDriver;
use crate::drivers::strip::StripDriver;

/// Concrete adapter combining all tower actuators behind port traits.
pub struct HardwareAdapter {
    coils: CoilDriver,
    strip_a: StripDriver,
    strip_b: StripDriver,
    audio: AudioLink,
}

impl HardwareAdapter {
    pub fn new(
        coils: CoilDriver,
        strip_a: StripDriver,
        strip_b: StripDriver,
        audio: AudioLink,
    ) -> Self {
        Self {
            coils,
            strip_a,
            strip_b,
            audio,
        }
    }
}

// ── CoilPort implementation ───────────────────────────────────

impl CoilPort for HardwareAdapter {
    fn apply_coils(&mut self, pattern: CoilPattern) {
        self.coils.apply(pattern);
    }

    fn release_coils(&mut self) {
        self.coils.release();
    }
}

// ── StripPort implementation ──────────────────────────────────
//
// The strips render as a synchronized pair: every call lands on strip A
// first, then strip B. A failed flush on one strip must not starve the
// other, so errors are logged per strip and swallowed.

impl StripPort for HardwareAdapter {
    fn strip_len(&self) -> usize {
        self.strip_a.len()
    }

    fn clear(&mut self) {
        self.strip_a.clear();
        self.strip_b.clear();
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        self.strip_a.set_pixel(index, color);
        self.strip_b.set_pixel(index, color);
    }

    fn flush(&mut self) {
        if let Err(e) = self.strip_a.flush() {
            warn!("{}: {}", self.strip_a.label(), e);
        }
        if let Err(e) = self.strip_b.flush() {
            warn!("{}: {}", self.strip_b.label(), e);
        }
    }
}

// ── AudioPort implementation ──────────────────────────────────

impl AudioPort for HardwareAdapter {
    fn audio_begin(&mut self) {
        self.audio.begin();
    }

    fn audio_reconnect(&mut self) {
        self.audio.reconnect();
    }

    fn set_volume(&mut self, volume: f32) {
        self.audio.set_volume(volume);
    }
}
