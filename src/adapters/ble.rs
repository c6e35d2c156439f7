//! BLE command channel.
//!
//! GATT server exposing the tower's single text-command characteristic.
//! A peer (usually the companion app) writes a short ASCII token; the
//! write callback decodes it into a [`Command`] and hands it to the
//! queue in [`crate::events`] for the main loop to drain. Unknown tokens
//! are dropped without acknowledgement — the channel carries no replies.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid GATT server over the shared
//!   dual-mode controller brought up by [`init_dual_mode`].
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                      | Perms      |
//! |----------------|---------------------------|------------|
//! | Command        | `beb5483e-…-ea07361b26a8` | Read+Write |

use super::utils::is_printable_ascii;
use core::sync::atomic::{AtomicBool, Ordering};
use log::{debug, error, info, warn};

use crate::app::commands::Command;
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const SERVICE_UUID: u128 = 0x4fafc201_1fb5_459e_8fcc_c5c9c331914b;
pub const CHAR_COMMAND: u128 = 0xbeb5483e_36e1_4688_b7f5_ea07361b26a8;

/// Capacity of the decoded token buffer. The real vocabulary tops out at
/// six characters; anything still longer than this after filtering can
/// never match and is cut off rather than copied.
pub const MAX_COMMAND_LEN: usize = 32;

// ───────────────────────────────────────────────────────────────
// Channel state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Idle,
    Advertising,
    Connected,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Shared Bluetooth stack
// ───────────────────────────────────────────────────────────────

/// Set once [`init_dual_mode`] has brought the controller and Bluedroid
/// host up. Both Bluetooth channels check this before starting.
static BT_STACK_READY: AtomicBool = AtomicBool::new(false);

/// Whether the shared Bluetooth stack is running.
pub(crate) fn bt_stack_up() -> bool {
    BT_STACK_READY.load(Ordering::Relaxed)
}

/// Bring up the Bluetooth controller and Bluedroid host in dual mode.
///
/// The command channel runs over BLE and the audio sink over Classic;
/// one controller serves both, so this runs once at boot before either
/// channel starts. Fail-soft: on error the stack stays down, the two
/// channels report themselves unavailable and the rest of the firmware
/// keeps running.
pub fn init_dual_mode() -> bool {
    if bt_stack_up() {
        return true;
    }
    match platform_init_dual_mode() {
        Ok(()) => {
            BT_STACK_READY.store(true, Ordering::Relaxed);
            info!("BT: dual-mode stack ready (BLE + Classic)");
            true
        }
        Err(e) => {
            error!("BT: Bluetooth unavailable: {e}");
            false
        }
    }
}

#[cfg(target_os = "espidf")]
fn platform_init_dual_mode() -> Result<(), CommsError> {
    use esp_idf_svc::sys::*;
    unsafe {
        // Classic BT memory stays resident for the audio sink; nothing is
        // released back from either half of the controller.
        let mut bt_cfg = esp_bt_controller_config_t::default();
        bt_cfg.mode = esp_bt_mode_t_ESP_BT_MODE_BTDM as u8;
        bt_cfg.bt_max_acl_conn = 1;
        bt_cfg.ble_max_conn = 1;

        let ret = esp_bt_controller_init(&mut bt_cfg);
        if ret != ESP_OK as i32 {
            error!("BT: bt_controller_init failed ({})", ret);
            return Err(CommsError::BtControllerInitFailed);
        }

        let ret = esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BTDM);
        if ret != ESP_OK as i32 {
            error!("BT: bt_controller_enable failed ({})", ret);
            return Err(CommsError::BtControllerEnableFailed);
        }

        let ret = esp_bluedroid_init();
        if ret != ESP_OK as i32 {
            error!("BT: bluedroid_init failed ({})", ret);
            return Err(CommsError::BluedroidInitFailed);
        }

        let ret = esp_bluedroid_enable();
        if ret != ESP_OK as i32 {
            error!("BT: bluedroid_enable failed ({})", ret);
            return Err(CommsError::BluedroidEnableFailed);
        }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn platform_init_dual_mode() -> Result<(), CommsError> {
    info!("BT(sim): dual-mode stack up");
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Command decode
// ───────────────────────────────────────────────────────────────

/// Filter a raw characteristic write down to its printable ASCII bytes.
///
/// Phone BLE stacks routinely append a trailing NUL or newline to short
/// writes; stripping instead of rejecting keeps `"rotate\n"` working.
pub fn sanitize_token(raw: &[u8]) -> heapless::String<MAX_COMMAND_LEN> {
    let mut token = heapless::String::new();
    for &byte in raw {
        if !is_printable_ascii(byte) {
            continue;
        }
        if token.push(byte as char).is_err() {
            break;
        }
    }
    token
}

/// Decode one characteristic write into a command.
/// Unknown tokens are logged at debug and dropped; the channel stays open.
pub fn decode_write(raw: &[u8]) -> Option<Command> {
    let token = sanitize_token(raw);
    match Command::parse(&token) {
        Some(command) => {
            info!("BLE: received '{}'", token);
            Some(command)
        }
        None => {
            debug!("BLE: ignoring unknown write '{}' ({} raw bytes)", token, raw.len());
            None
        }
    }
}

/// Decode and queue one write for the main loop. Shared by the GATT
/// write callback and the host simulation.
fn dispatch_write(raw: &[u8]) {
    if let Some(command) = decode_write(raw) {
        if !crate::events::push_command(command) {
            warn!("BLE: command queue full, dropping '{}'", command.token());
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF GATT server
// ───────────────────────────────────────────────────────────────

// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures. These atomics bridge the callback context to the channel.

#[cfg(target_os = "espidf")]
use core::sync::atomic::AtomicU32;

#[cfg(target_os = "espidf")]
static BLE_CMD_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_LINK_UP: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "espidf")]
fn uuid128_to_esp(uuid: u128) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 16;
    unsafe {
        t.uuid.uuid128 = uuid.to_le_bytes();
    }
    t
}

// Armed from the GATTS callback chain: first once the command
// characteristic registers, then again after every disconnect
// (Bluedroid stops advertising when a central connects).
#[cfg(target_os = "espidf")]
fn start_advertising() {
    use esp_idf_svc::sys::*;
    unsafe {
        let mut adv_params = esp_ble_adv_params_t {
            adv_int_min: 0x20,
            adv_int_max: 0x40,
            adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
            own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
            channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
            adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
            ..core::mem::zeroed()
        };
        esp_ble_gap_start_advertising(&mut adv_params);
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    _param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising started");
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising stopped");
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gatts_event_handler(
    event: esp_idf_svc::sys::esp_gatts_cb_event_t,
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    param: *mut esp_idf_svc::sys::esp_ble_gatts_cb_param_t,
) {
    use esp_idf_svc::sys::*;

    match event {
        esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
            log::info!("BLE GATTS: app registered (if={})", gatts_if);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: uuid128_to_esp(SERVICE_UUID),
                    inst_id: 0,
                },
                is_primary: true,
            };
            // 1 service + 1 characteristic declaration + 1 value, with slack.
            unsafe {
                esp_ble_gatts_create_service(gatts_if, &mut svc_id, 4);
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let p = unsafe { &(*param).create };
            let svc_handle = p.service_handle;
            log::info!("BLE GATTS: service created (handle={})", svc_handle);
            let mut char_uuid = uuid128_to_esp(CHAR_COMMAND);
            unsafe {
                esp_ble_gatts_start_service(svc_handle);
                esp_ble_gatts_add_char(
                    svc_handle,
                    &mut char_uuid,
                    (ESP_GATT_PERM_READ | ESP_GATT_PERM_WRITE) as esp_gatt_perm_t,
                    (ESP_GATT_CHAR_PROP_BIT_READ | ESP_GATT_CHAR_PROP_BIT_WRITE)
                        as esp_gatt_char_prop_t,
                    core::ptr::null_mut(),
                    core::ptr::null_mut(),
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let p = unsafe { &(*param).add_char };
            BLE_CMD_CHAR_HANDLE.store(u32::from(p.attr_handle), Ordering::Relaxed);
            log::info!(
                "BLE GATTS: command characteristic ready (handle={})",
                p.attr_handle
            );
            // Last link in the chain: a central now has something to
            // write to, so advertising may begin.
            start_advertising();
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let p = unsafe { &(*param).connect };
            BLE_LINK_UP.store(true, Ordering::Relaxed);
            log::info!("BLE GATTS: central connected (conn_id={})", p.conn_id);
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            BLE_LINK_UP.store(false, Ordering::Relaxed);
            log::info!("BLE GATTS: central disconnected, advertising again");
            start_advertising();
        }
        esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
            let p = unsafe { &(*param).write };
            if u32::from(p.handle) == BLE_CMD_CHAR_HANDLE.load(Ordering::Relaxed) {
                let data = unsafe { core::slice::from_raw_parts(p.value, p.len as usize) };
                dispatch_write(data);
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// Command channel
// ───────────────────────────────────────────────────────────────

pub struct BleCommandChannel {
    state: BleState,
    device_name: heapless::String<32>,
}

impl BleCommandChannel {
    pub fn new(device_name: heapless::String<32>) -> Self {
        Self {
            state: BleState::Idle,
            device_name,
        }
    }

    pub fn state(&self) -> BleState {
        #[cfg(target_os = "espidf")]
        if self.state == BleState::Advertising && BLE_LINK_UP.load(Ordering::Relaxed) {
            return BleState::Connected;
        }
        self.state
    }

    /// Register the GATT application. The Bluedroid callback chain
    /// creates the service and begins advertising once the command
    /// characteristic is up. Requires [`init_dual_mode`] to have
    /// succeeded first.
    pub fn start(&mut self) {
        if !bt_stack_up() {
            warn!("BLE: Bluetooth stack down, command channel unavailable");
            self.state = BleState::Failed;
            return;
        }
        match self.platform_start() {
            Ok(()) => {
                self.state = BleState::Advertising;
                info!("BLE: advertising as '{}'", self.device_name);
            }
            Err(e) => {
                error!("BLE: start failed: {e}");
                self.state = BleState::Failed;
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::sys::*;
        unsafe {
            esp_ble_gap_register_callback(Some(ble_gap_event_handler));
            esp_ble_gatts_register_callback(Some(ble_gatts_event_handler));

            let ret = esp_ble_gatts_app_register(0);
            if ret != ESP_OK as i32 {
                error!("BLE: gatts_app_register failed ({})", ret);
                return Err(CommsError::GattRegisterFailed);
            }

            // The C side expects a NUL terminator; heapless strings carry none.
            let mut name = [0u8; 33];
            let src = self.device_name.as_bytes();
            let len = src.len().min(32);
            name[..len].copy_from_slice(&src[..len]);
            esp_ble_gap_set_device_name(name.as_ptr() as *const _);
        }
        // Advertising is armed by the ADD_CHAR callback, not here: the
        // app_register round trip has not created the service yet.
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), CommsError> {
        info!(
            "BLE(sim): advertising '{}' (service {:032x})",
            self.device_name, SERVICE_UUID
        );
        Ok(())
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Simulation: a central connected.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_central_connected(&mut self) {
        if self.state == BleState::Advertising {
            info!("BLE(sim): central connected");
            self.state = BleState::Connected;
        }
    }

    /// Simulation: the central dropped the link; advertising resumes.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_central_disconnected(&mut self) {
        if self.state == BleState::Connected {
            info!("BLE(sim): central disconnected, advertising again");
            self.state = BleState::Advertising;
        }
    }

    /// Simulation: one raw write to the command characteristic, decoded
    /// and queued exactly like the GATT write callback. A channel that
    /// never started has no characteristic to write to; such writes are
    /// dropped here the way the zero-handle guard drops them on target.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_central_write(&mut self, raw: &[u8]) {
        if matches!(self.state, BleState::Idle | BleState::Failed) {
            debug!("BLE(sim): write with no live service, dropped");
            return;
        }
        self.sim_central_connected();
        dispatch_write(raw);
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
