//! Integration tests for the command producers: BLE writes and voice
//! events, through the shared queue, into the application service.
//!
//! The BLE side runs against the channel's host simulation hooks, which
//! feed the same decode-and-enqueue path as the GATT write callback.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::mock_hw::{ActuatorCall, BLACK, LogSink, MockHardware};

use towerfw::adapters::ble::{self, BleCommandChannel, BleState};
use towerfw::adapters::voice::{self, RecognizerEngine, RecognizerMode, SrEvent};
use towerfw::app::commands::Command;
use towerfw::app::light::LightMode;
use towerfw::app::motion::DRIVE_SEQUENCE;
use towerfw::app::service::AppService;
use towerfw::events;

// The command queue is a process-wide static shared by every test in
// this binary.  Tests that touch it take this lock and start from empty.
static QUEUE_LOCK: Mutex<()> = Mutex::new(());

fn exclusive_queue() -> MutexGuard<'static, ()> {
    let guard = QUEUE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    while events::pop_command().is_some() {}
    guard
}

/// An advertising channel over the simulated stack.
fn make_channel() -> BleCommandChannel {
    assert!(ble::init_dual_mode());
    let mut name = heapless::String::<32>::new();
    name.push_str("tower-test").ok();
    let mut channel = BleCommandChannel::new(name);
    channel.start();
    assert_eq!(channel.state(), BleState::Advertising);
    channel
}

fn fresh_app() -> (AppService, MockHardware, LogSink) {
    (AppService::new(), MockHardware::new(), LogSink::new())
}

// ── BLE writes → queue → service ─────────────────────────────

#[test]
fn ble_write_reaches_the_motor() {
    let _guard = exclusive_queue();
    let mut channel = make_channel();
    let (mut app, mut hw, mut sink) = fresh_app();

    // Phone stacks append terminators; the channel strips them.
    channel.sim_central_write(b"rotate\n");
    assert_eq!(events::queue_len(), 1);

    events::drain_commands(|command| app.handle_command(command, &mut hw, &mut sink));
    assert!(app.motor_running());
    assert!(events::queue_is_empty());

    app.tick(1_000, &mut hw);
    assert_eq!(
        hw.last_call(),
        Some(&ActuatorCall::ApplyCoils(DRIVE_SEQUENCE[0]))
    );
}

#[test]
fn unknown_writes_never_enqueue() {
    let _guard = exclusive_queue();
    let mut channel = make_channel();

    channel.sim_central_write(b"disco");
    channel.sim_central_write(b"");
    channel.sim_central_write(&[0x01, 0x02, 0xff]);

    assert!(events::queue_is_empty());
}

#[test]
fn writes_before_the_service_is_up_are_dropped() {
    let _guard = exclusive_queue();
    let mut name = heapless::String::<32>::new();
    name.push_str("tower-test").ok();
    let mut channel = BleCommandChannel::new(name);

    // The command characteristic does not exist until the channel starts.
    channel.sim_central_write(b"rotate\n");
    assert_eq!(channel.state(), BleState::Idle);
    assert!(events::queue_is_empty());

    // Once the service is live the same write goes through.
    assert!(ble::init_dual_mode());
    channel.start();
    channel.sim_central_write(b"rotate\n");
    assert_eq!(events::queue_len(), 1);
}

#[test]
fn commands_drain_in_arrival_order() {
    let _guard = exclusive_queue();
    let mut channel = make_channel();

    channel.sim_central_write(b"white");
    channel.sim_central_write(b"rotate");
    channel.sim_central_write(b"gibberish");
    channel.sim_central_write(b"stop");
    channel.sim_central_write(b"BT");

    let mut drained = Vec::new();
    events::drain_commands(|command| drained.push(command));
    assert_eq!(
        drained,
        vec![Command::White, Command::Rotate, Command::Stop, Command::AudioOn]
    );
}

#[test]
fn write_flood_is_bounded_by_the_queue() {
    let _guard = exclusive_queue();
    let mut channel = make_channel();

    for _ in 0..40 {
        channel.sim_central_write(b"red");
    }

    // 31 writes fit (32-slot ring, one sacrificed); the rest are
    // dropped, never blocked on.
    assert_eq!(events::queue_len(), 31);
    let mut drained = 0;
    events::drain_commands(|command| {
        assert_eq!(command, Command::Red);
        drained += 1;
    });
    assert_eq!(drained, 31);
    assert!(events::queue_is_empty());
}

#[test]
fn link_cycle_keeps_the_channel_usable() {
    let _guard = exclusive_queue();
    let mut channel = make_channel();

    channel.sim_central_connected();
    assert_eq!(channel.state(), BleState::Connected);
    channel.sim_central_write(b"blue");

    channel.sim_central_disconnected();
    assert_eq!(channel.state(), BleState::Advertising);

    // A write from a reconnecting central still lands.
    channel.sim_central_write(b"green");
    assert_eq!(channel.state(), BleState::Connected);

    let mut drained = Vec::new();
    events::drain_commands(|command| drained.push(command));
    assert_eq!(drained, vec![Command::Blue, Command::Green]);
}

// ── Voice events → service ───────────────────────────────────

/// Recorder standing in for the vendor engine's mode switch.
struct ScriptedEngine {
    mode: RecognizerMode,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self {
            mode: RecognizerMode::WakeWord,
        }
    }
}

impl RecognizerEngine for ScriptedEngine {
    fn set_mode(&mut self, mode: RecognizerMode) {
        self.mode = mode;
    }
}

#[test]
fn voice_session_drives_the_same_dispatch_path() {
    let (mut app, mut hw, mut sink) = fresh_app();
    let mut engine = ScriptedEngine::new();

    // "Hi E.S.P." → channel verified → command window opens.
    assert_eq!(voice::on_sr_event(SrEvent::WakeWord, &mut engine), None);
    assert_eq!(
        voice::on_sr_event(SrEvent::WakeWordChannelVerified(0), &mut engine),
        None
    );
    assert_eq!(engine.mode, RecognizerMode::Command);

    // "Start fan" (command id 2) while the window is open.
    let command = voice::on_sr_event(
        SrEvent::Command {
            command_id: 2,
            phrase_id: 5,
        },
        &mut engine,
    );
    assert_eq!(command, Some(Command::Rotate));
    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    assert!(app.motor_running());
    assert_eq!(engine.mode, RecognizerMode::Command, "window stays open");

    // "Stop fan" follows without a fresh wake word.
    let command = voice::on_sr_event(
        SrEvent::Command {
            command_id: 3,
            phrase_id: 6,
        },
        &mut engine,
    );
    assert_eq!(command, Some(Command::Stop));
    app.handle_command(Command::Stop, &mut hw, &mut sink);
    assert!(!app.motor_running());
    assert!(!hw.coils_energized());

    // Silence closes the window.
    voice::on_sr_event(SrEvent::Timeout, &mut engine);
    assert_eq!(engine.mode, RecognizerMode::WakeWord);
}

#[test]
fn voice_and_ble_share_one_application() {
    let _guard = exclusive_queue();
    let mut channel = make_channel();
    let (mut app, mut hw, mut sink) = fresh_app();
    let mut engine = ScriptedEngine::new();

    channel.sim_central_write(b"water");
    events::drain_commands(|command| app.handle_command(command, &mut hw, &mut sink));
    assert_eq!(app.light_mode(), LightMode::WaterArmed);

    // Voice lights-off (command id 1) overrides the BLE-started animation.
    voice::on_sr_event(SrEvent::WakeWordChannelVerified(0), &mut engine);
    let command = voice::on_sr_event(
        SrEvent::Command {
            command_id: 1,
            phrase_id: 4,
        },
        &mut engine,
    );
    assert_eq!(command, Some(Command::LightsOff));
    app.handle_command(Command::LightsOff, &mut hw, &mut sink);

    assert_eq!(app.light_mode(), LightMode::Idle);
    assert!(hw.showing_solid(BLACK));
}
