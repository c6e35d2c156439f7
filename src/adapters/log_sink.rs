//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production). A future telemetry adapter
//! would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | actuators halted, tower idle");
            }
            AppEvent::CommandApplied(command) => {
                info!("CMD   | {}", command.token());
            }
            AppEvent::MotionChanged { running } => {
                info!("MOTOR | running={}", running);
            }
            AppEvent::LightChanged { mode } => {
                info!("LIGHT | {:?}", mode);
            }
            AppEvent::AudioLinkRequested => {
                info!("AUDIO | link requested");
            }
        }
    }
}
