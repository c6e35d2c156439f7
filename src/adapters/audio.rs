//! Bluetooth audio link adapter (classic A2DP sink).
//!
//! Control plane only: brings the sink up, makes the device
//! discoverable, remembers the last connected peer, and retries that
//! peer on demand. Decoded PCM leaves through the downstream audio
//! module on the auxiliary power rail — the codec and I2S data path
//! belong to that module, not to this firmware.
//!
//! Shares the dual-mode Bluetooth stack with the BLE command channel;
//! [`begin`](AudioLink::begin) refuses politely when the stack never
//! came up. Every operation is fail-soft: log and return, never abort.

use log::{info, warn};

use crate::error::CommsError;
use crate::pins;

#[cfg(target_os = "espidf")]
use log::debug;

#[cfg(target_os = "espidf")]
use std::sync::Mutex;

/// Last A2DP peer that completed a connection, written from the
/// Bluedroid callback task. A Mutex (not an atomic) because the value
/// is a 6-byte address; the callback runs in task context, not ISR.
#[cfg(target_os = "espidf")]
static AUDIO_PEER: Mutex<Option<[u8; 6]>> = Mutex::new(None);

pub struct AudioLink {
    device_name: heapless::String<32>,
    volume: f32,
    started: bool,
}

impl AudioLink {
    pub fn new(device_name: heapless::String<32>) -> Self {
        info!(
            "audio: codec on I2C(SDA {}, SCL {}), I2S(BCLK {}, LRCK {}, DIN {})",
            pins::CODEC_I2C_SDA_GPIO,
            pins::CODEC_I2C_SCL_GPIO,
            pins::I2S_SCLK_GPIO,
            pins::I2S_LRCK_GPIO,
            pins::I2S_DSDIN_GPIO
        );
        Self {
            device_name,
            volume: 1.0,
            started: false,
        }
    }

    /// Bring the sink up and make it discoverable under the configured
    /// name. A second call is a no-op — the caller follows up with
    /// [`reconnect`](AudioLink::reconnect) either way.
    pub fn begin(&mut self) {
        if self.started {
            info!("audio: sink already up");
            return;
        }
        match self.platform_begin() {
            Ok(()) => {
                self.started = true;
                info!("audio: sink up, discoverable as '{}'", self.device_name);
            }
            Err(e) => warn!("audio: begin failed: {}", e),
        }
    }

    /// Retry the last connected peer, if the sink is up and one is known.
    pub fn reconnect(&mut self) {
        if !self.started {
            warn!("audio: reconnect before begin, ignored");
            return;
        }
        match self.platform_reconnect() {
            Ok(true) => info!("audio: reconnect requested"),
            Ok(false) => info!("audio: no previous peer to reconnect"),
            Err(e) => warn!("audio: reconnect failed: {}", e),
        }
    }

    /// Set playback volume, clamped to `0.0..=1.0`. The powered audio
    /// module applies its own gain; this value rides along in the sink
    /// state for the vendor path to consume.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        info!("audio: volume {:.2}", self.volume);
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    // ── Platform: ESP-IDF (Bluedroid classic) ─────────────────

    #[cfg(target_os = "espidf")]
    fn platform_begin(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::sys::*;

        if !super::ble::bt_stack_up() {
            warn!("audio: Bluetooth stack down, sink unavailable");
            return Err(CommsError::AudioSinkInitFailed);
        }

        // Classic-GAP name; NUL-terminated copy for the C boundary.
        let mut name_buf = [0u8; 33];
        let name = self.device_name.as_bytes();
        let n = name.len().min(32);
        name_buf[..n].copy_from_slice(&name[..n]);

        unsafe {
            esp_bt_gap_set_device_name(name_buf.as_ptr().cast());

            esp_a2d_register_callback(Some(a2d_event_handler));
            let ret = esp_a2d_sink_init();
            if ret != ESP_OK as i32 {
                warn!("audio: a2d_sink_init failed ({})", ret);
                return Err(CommsError::AudioSinkInitFailed);
            }

            esp_bt_gap_set_scan_mode(
                esp_bt_connection_mode_t_ESP_BT_CONNECTABLE,
                esp_bt_discovery_mode_t_ESP_BT_GENERAL_DISCOVERABLE,
            );
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_reconnect(&mut self) -> Result<bool, CommsError> {
        use esp_idf_svc::sys::*;

        let Some(mut bda) = AUDIO_PEER.lock().ok().and_then(|peer| *peer) else {
            return Ok(false);
        };

        // SAFETY: bda is a local 6-byte address copy; the stack reads
        // it synchronously during the call.
        let ret = unsafe { esp_a2d_sink_connect(bda.as_mut_ptr()) };
        if ret != ESP_OK as i32 {
            return Err(CommsError::AudioReconnectFailed);
        }
        Ok(true)
    }

    // ── Platform: simulation ──────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin(&mut self) -> Result<(), CommsError> {
        log::info!("audio(sim): sink up as '{}'", self.device_name);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_reconnect(&mut self) -> Result<bool, CommsError> {
        Ok(false)
    }
}

// ── Bluedroid A2DP callback (ESP-IDF only) ────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn a2d_event_handler(
    event: esp_idf_svc::sys::esp_a2d_cb_event_t,
    param: *mut esp_idf_svc::sys::esp_a2d_cb_param_t,
) {
    use esp_idf_svc::sys::*;

    if event != esp_a2d_cb_event_t_ESP_A2D_CONNECTION_STATE_EVT || param.is_null() {
        return;
    }
    // SAFETY: for CONNECTION_STATE_EVT the union holds conn_stat;
    // Bluedroid guarantees the pointer for the duration of the callback.
    let conn = unsafe { &(*param).conn_stat };
    if conn.state == esp_a2d_connection_state_t_ESP_A2D_CONNECTION_STATE_CONNECTED {
        if let Ok(mut peer) = AUDIO_PEER.lock() {
            *peer = Some(conn.remote_bda);
        }
        info!("audio: peer connected");
    } else if conn.state == esp_a2d_connection_state_t_ESP_A2D_CONNECTION_STATE_DISCONNECTED {
        debug!("audio: peer disconnected");
    }
}
