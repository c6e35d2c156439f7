//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (coil driver, LED strips, the audio link, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly — host tests substitute recording mocks.

use rgb::RGB8;

use super::motion::CoilPattern;

// ───────────────────────────────────────────────────────────────
// Coil port (driven adapter: domain → stepper coils)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the four stepper coil lines.
///
/// Implementations translate a [`CoilPattern`] into GPIO levels in one
/// call, so a drive phase is never left half applied between lines.
pub trait CoilPort {
    /// Drive the four coil lines to the given pattern.
    fn apply_coils(&mut self, pattern: CoilPattern);

    /// De-energize every coil line (all low).  The safe resting state.
    fn release_coils(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Strip port (driven adapter: domain → WS2812 strip pair)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the two WS2812 strips.
///
/// The strips are physically distinct but always driven as a synchronized
/// pair: every operation acts on strip A first, then strip B.  Pixel
/// writes land in a framebuffer; nothing reaches the hardware until
/// [`flush`](StripPort::flush).
pub trait StripPort {
    /// Number of pixels on each strip (both strips are the same length).
    fn strip_len(&self) -> usize;

    /// Zero the framebuffers of both strips.
    fn clear(&mut self);

    /// Stage one pixel on both strips.  Out-of-range indices are ignored.
    fn set_pixel(&mut self, index: usize, color: RGB8);

    /// Push both framebuffers out to the hardware, strip A first.
    fn flush(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Audio port (driven adapter: domain → Bluetooth audio link)
// ───────────────────────────────────────────────────────────────

/// Control-plane port for the classic-Bluetooth audio sink.
///
/// Every operation is fail-soft: implementations log trouble and return,
/// they never take the control loop down with them.
pub trait AudioPort {
    /// Bring up the audio sink and make it discoverable.  Idempotent —
    /// calling on a started link only retries the peer connection.
    fn audio_begin(&mut self);

    /// Re-open the stream to the last paired peer, if one is known.
    fn audio_reconnect(&mut self);

    /// Set playback volume, `0.0..=1.0` (clamped).
    fn set_volume(&mut self, volume: f32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today;
/// a BLE notify characteristic is the obvious future consumer).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
