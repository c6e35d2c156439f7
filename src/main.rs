//! Tower Firmware — Main Entry Point
//!
//! Hexagonal architecture around one cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  BleCommandChannel        voice (esp-sr bridge)            │
//! │        │                        │                          │
//! │        └──────► command queue ◄─┘                          │
//! │                      │                                     │
//! │  HardwareAdapter     │          LogEventSink               │
//! │  (Coil+Strip+Audio)  │          (EventSink)                │
//! │                      ▼                                     │
//! │  ──────────── Port Trait Boundary ─────────────            │
//! │  ┌──────────────────────────────────────────┐              │
//! │  │         AppService (pure logic)          │              │
//! │  │  MotionController · LightController      │              │
//! │  └──────────────────────────────────────────┘              │
//! │                                                            │
//! │  Main loop: drain commands · tick · 10 ms yield            │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod config;
mod error;
mod events;
mod pins;

mod adapters;
mod app;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Result, anyhow};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use adapters::audio::AudioLink;
use adapters::ble::{self, BleCommandChannel};
use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::time::Esp32TimeAdapter;
use adapters::voice;
use app::ports::AudioPort;
use app::service::AppService;
use config::SystemConfig;
use drivers::coils::CoilDriver;
use drivers::strip::StripDriver;

/// Responsiveness floor for the cooperative loop. Motor and LED cadence
/// come from each controller's own interval gate, not from this yield.
const LOOP_YIELD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Tower v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();

    // ── 2. Actuator bring-up (fatal on failure) ───────────────
    drivers::hw_init::init_peripherals().map_err(|e| anyhow!("coil GPIO init: {e}"))?;

    let peripherals = Peripherals::take().map_err(|e| anyhow!("peripherals: {e}"))?;
    let strip_a = StripDriver::new("strip A", peripherals.rmt.channel0, pins::STRIP_A_GPIO)
        .map_err(|e| anyhow!("strip A: {e}"))?;
    let strip_b = StripDriver::new("strip B", peripherals.rmt.channel1, pins::STRIP_B_GPIO)
        .map_err(|e| anyhow!("strip B: {e}"))?;

    let mut hw = HardwareAdapter::new(
        CoilDriver::new(),
        strip_a,
        strip_b,
        AudioLink::new(config.audio_device_name.clone()),
    );

    let mut log_sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();

    // ── 3. App core: halt the motor, blank both strips ────────
    let mut app = AppService::new();
    app.start(&mut hw, &mut log_sink);

    // ── 4. Bluetooth (fail-soft from here on) ─────────────────
    let bt_up = ble::init_dual_mode();
    if !bt_up {
        warn!("running without Bluetooth (no BLE commands, no audio link)");
    }

    let mut ble_channel = BleCommandChannel::new(config.ble_device_name.clone());
    ble_channel.start();

    // ── 5. Audio boot volume ──────────────────────────────────
    hw.set_volume(config.audio_volume);

    // ── 6. Speech recognizer ──────────────────────────────────
    if !voice::start_recognizer() {
        warn!("voice control disabled for this session");
    }

    // ── 7. Auxiliary power rail ───────────────────────────────
    drivers::hw_init::enable_aux_rail();

    info!("System ready. Entering main loop.");

    // ── 8. Cooperative loop ───────────────────────────────────
    loop {
        events::drain_commands(|command| {
            app.handle_command(command, &mut hw, &mut log_sink);
        });

        app.tick(clock.uptime_ms(), &mut hw);

        FreeRtos::delay_ms(LOOP_YIELD_MS);
    }
}
