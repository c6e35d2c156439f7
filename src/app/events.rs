//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial today, push to a
//! notify characteristic tomorrow.
//!
//! Only transitions are reported.  The 10 ms control loop and the render
//! ticks stay silent, so the serial console shows state changes rather
//! than a heartbeat.

use super::commands::Command;
use super::light::LightMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started; actuators are in their
    /// resting state (coils released, strips dark).
    Started,

    /// A command arrived on one of the channels and was applied.
    CommandApplied(Command),

    /// The stepper changed run state.
    MotionChanged { running: bool },

    /// The lighting controller changed mode.
    LightChanged { mode: LightMode },

    /// The Bluetooth audio link was asked to come up and re-pair.
    AudioLinkRequested,
}
