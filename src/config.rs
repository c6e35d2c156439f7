//! System configuration parameters
//!
//! Device identity and boot-time audio settings for the tower. Timing
//! constants (step/update intervals, loop yield) live with the controllers
//! that enforce them — they are part of the motion/animation contracts, not
//! tunables.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Identity ---
    /// Name advertised on the BLE command channel.
    pub ble_device_name: heapless::String<32>,
    /// Name presented by the Classic Bluetooth audio sink.
    pub audio_device_name: heapless::String<32>,

    // --- Audio ---
    /// Playback volume applied at boot (0.0 ..= 1.0).
    pub audio_volume: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Names the companion app and paired speakers already know;
            // changing them orphans existing bonds.
            ble_device_name: heapless::String::try_from("TOWER V0.2_BLE").unwrap_or_default(),
            audio_device_name: heapless::String::try_from("TOWERV0.2_AUDIO").unwrap_or_default(),

            audio_volume: 1.0,
        }
    }
}
