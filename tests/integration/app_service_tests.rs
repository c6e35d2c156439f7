//! Integration tests for the AppService → controllers → actuators pipeline.
//!
//! These run on the host (x86_64) and drive the service the way the
//! firmware loop does: commands in, then one `tick` per loop pass with a
//! simulated millisecond clock.  Assertions check the resulting actuator
//! call history on [`MockHardware`].

use crate::mock_hw::{ActuatorCall, BLACK, LogSink, MockHardware, STRIP_LEN};

use towerfw::app::commands::Command;
use towerfw::app::light::{self, LightMode, UPDATE_INTERVAL_MS};
use towerfw::app::motion::{DRIVE_SEQUENCE, STEP_INTERVAL_MS};
use towerfw::app::service::AppService;

/// A started service with the boot calls already cleared, so each
/// scenario's call ledger begins empty.  Boot itself is asserted in
/// `boot_puts_every_actuator_in_a_known_state`.
fn make_app() -> (AppService, MockHardware, LogSink) {
    let mut app = AppService::new();
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut sink);
    hw.calls.clear();
    hw.frames.clear();
    sink.events.clear();
    (app, hw, sink)
}

/// Drive the scheduler the way the firmware loop does: one tick per
/// `step_ms`, from `from_ms` through `to_ms` inclusive.
fn run_loop(app: &mut AppService, hw: &mut MockHardware, from_ms: u32, to_ms: u32, step_ms: u32) {
    let mut now = from_ms;
    while now <= to_ms {
        app.tick(now, hw);
        now += step_ms;
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_puts_every_actuator_in_a_known_state() {
    let mut app = AppService::new();
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();

    app.start(&mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::ReleaseCoils,
            ActuatorCall::StripClear,
            ActuatorCall::StripFlush,
        ],
        "boot must release the motor before touching the strips"
    );
    assert!(!hw.coils_energized());
    assert!(hw.showing_solid(BLACK), "both strips dark after boot");
    assert!(sink.saw("Started"));
}

// ── Motion ────────────────────────────────────────────────────

#[test]
fn rotate_walks_the_drive_table_in_order() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, STEP_INTERVAL_MS, STEP_INTERVAL_MS * 5, STEP_INTERVAL_MS);

    let applied: Vec<_> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::ApplyCoils(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(
        applied,
        vec![
            DRIVE_SEQUENCE[0],
            DRIVE_SEQUENCE[1],
            DRIVE_SEQUENCE[2],
            DRIVE_SEQUENCE[3],
            DRIVE_SEQUENCE[0],
        ]
    );
    assert!(app.motor_running());
    assert!(sink.saw("MotionChanged { running: true }"));
}

#[test]
fn fast_loop_does_not_overdrive_the_motor() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    // Loop ten times faster than the step gate.
    run_loop(&mut app, &mut hw, 1, 50, 1);

    assert_eq!(hw.step_count(), 5, "one step per {STEP_INTERVAL_MS} ms");
}

#[test]
fn stop_before_the_first_step_leaves_only_a_release() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    app.tick(STEP_INTERVAL_MS / 2, &mut hw);
    app.handle_command(Command::Stop, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, STEP_INTERVAL_MS, STEP_INTERVAL_MS * 20, STEP_INTERVAL_MS);

    assert_eq!(hw.calls, vec![ActuatorCall::ReleaseCoils]);
    assert!(!hw.coils_energized());
    assert!(!app.motor_running());
}

#[test]
fn stop_after_a_step_forces_the_lines_low() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    app.tick(1_000, &mut hw);
    assert!(hw.coils_energized(), "first phase drives line D high");

    app.handle_command(Command::Stop, &mut hw, &mut sink);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::ReleaseCoils));
    assert!(!hw.coils_energized());

    // A stopped motor stays stopped through further loop passes.
    let calls_after_stop = hw.calls.len();
    run_loop(&mut app, &mut hw, 1_010, 2_000, STEP_INTERVAL_MS);
    assert_eq!(hw.calls.len(), calls_after_stop);
}

#[test]
fn line_a_never_drives_in_a_long_run() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, STEP_INTERVAL_MS, 2_000, STEP_INTERVAL_MS);

    assert_eq!(hw.step_count(), 200);
    assert!(!hw.line_a_ever_high());
}

#[test]
fn restart_rewinds_to_the_top_of_the_table() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, STEP_INTERVAL_MS, STEP_INTERVAL_MS * 3, STEP_INTERVAL_MS);
    assert_eq!(app.motor_phase(), 3);

    // Rotate while already running restarts the sequence from phase 0.
    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    app.tick(STEP_INTERVAL_MS * 4, &mut hw);
    assert_eq!(
        hw.last_call(),
        Some(&ActuatorCall::ApplyCoils(DRIVE_SEQUENCE[0]))
    );
}

// ── Lighting ──────────────────────────────────────────────────

#[test]
fn colour_paint_waits_for_the_gate_and_renders_once() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::White, &mut hw, &mut sink);
    assert_eq!(app.light_mode(), LightMode::SolidArmed);

    app.tick(UPDATE_INTERVAL_MS - 1, &mut hw);
    assert_eq!(hw.flush_count(), 0, "inside the render gate");

    app.tick(UPDATE_INTERVAL_MS, &mut hw);
    assert_eq!(hw.flush_count(), 1);
    assert!(hw.showing_solid(light::WHITE));
    assert_eq!(app.light_mode(), LightMode::Idle, "paint is consumed");

    run_loop(&mut app, &mut hw, UPDATE_INTERVAL_MS * 2, UPDATE_INTERVAL_MS * 6, UPDATE_INTERVAL_MS);
    assert_eq!(hw.flush_count(), 1, "a solid colour renders exactly once");
}

#[test]
fn water_keeps_painting_fresh_frames() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Water, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, UPDATE_INTERVAL_MS, UPDATE_INTERVAL_MS * 3, UPDATE_INTERVAL_MS);

    assert_eq!(hw.flush_count(), 3);
    assert_eq!(app.light_mode(), LightMode::WaterArmed, "water never self-stops");
    for frame in &hw.frames {
        let first = frame[0];
        assert!(
            frame.iter().all(|&px| px == first),
            "each water frame is a single uniform colour"
        );
    }
    // The repaint covers every pixel; nothing is cleared in between.
    assert!(!hw.calls.contains(&ActuatorCall::StripClear));
}

#[test]
fn lights_off_is_immediate_even_inside_the_gate() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Water, &mut hw, &mut sink);
    app.tick(UPDATE_INTERVAL_MS, &mut hw);
    assert_eq!(hw.flush_count(), 1);

    // Right after a render, deep inside the 200 ms gate.
    app.handle_command(Command::LightsOff, &mut hw, &mut sink);
    assert_eq!(hw.flush_count(), 2, "off does not wait for the gate");
    assert!(hw.showing_solid(BLACK));
    assert_eq!(app.light_mode(), LightMode::Idle);

    let calls_after_off = hw.calls.len();
    run_loop(&mut app, &mut hw, UPDATE_INTERVAL_MS * 2, UPDATE_INTERVAL_MS * 5, UPDATE_INTERVAL_MS);
    assert_eq!(hw.calls.len(), calls_after_off, "idle ticks are free");
}

#[test]
fn switching_modes_shares_the_render_gate() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Water, &mut hw, &mut sink);
    app.tick(UPDATE_INTERVAL_MS, &mut hw);
    assert_eq!(hw.flush_count(), 1);

    // Arming a solid right after a water frame must not sneak an early
    // render past the shared gate.
    app.handle_command(Command::Blue, &mut hw, &mut sink);
    app.tick(UPDATE_INTERVAL_MS * 2 - 1, &mut hw);
    assert_eq!(hw.flush_count(), 1);

    app.tick(UPDATE_INTERVAL_MS * 2, &mut hw);
    assert_eq!(hw.flush_count(), 2);
    assert!(hw.showing_solid(light::BLUE));
}

// ── Audio ─────────────────────────────────────────────────────

#[test]
fn audio_link_request_reaches_the_codec() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::AudioOn, &mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![ActuatorCall::AudioBegin, ActuatorCall::AudioReconnect]
    );
    assert!(sink.saw("AudioLinkRequested"));
    // The audio path leaves motion and lighting untouched.
    assert!(!app.motor_running());
    assert_eq!(app.light_mode(), LightMode::Idle);
}

// ── Whole-session behaviour ───────────────────────────────────

#[test]
fn motion_and_water_share_the_loop_without_starving() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    app.handle_command(Command::Water, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, STEP_INTERVAL_MS, 1_000, STEP_INTERVAL_MS);

    // 10 ms cadence for the motor, 200 ms for the strips, same clock.
    assert_eq!(hw.step_count(), 100);
    assert_eq!(hw.flush_count(), 5);
    assert!(!hw.line_a_ever_high());
}

#[test]
fn mixed_session_ends_at_rest() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Purple, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, 10, 300, 10);
    assert!(hw.showing_solid(light::PURPLE));

    app.handle_command(Command::Rotate, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, 310, 600, 10);
    assert!(app.motor_running());

    app.handle_command(Command::Water, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, 610, 900, 10);

    app.handle_command(Command::Stop, &mut hw, &mut sink);
    app.handle_command(Command::LightsOff, &mut hw, &mut sink);
    run_loop(&mut app, &mut hw, 910, 1_200, 10);

    assert!(!app.motor_running());
    assert_eq!(app.light_mode(), LightMode::Idle);
    assert!(!hw.coils_energized());
    assert!(hw.showing_solid(BLACK));

    // The sink recorded the whole command history in order.
    let applied: Vec<_> = sink
        .events
        .iter()
        .filter(|e| e.starts_with("CommandApplied"))
        .cloned()
        .collect();
    assert_eq!(
        applied,
        vec![
            "CommandApplied(Purple)",
            "CommandApplied(Rotate)",
            "CommandApplied(Water)",
            "CommandApplied(Stop)",
            "CommandApplied(LightsOff)",
        ]
    );
}

#[test]
fn strip_writes_cover_the_full_pair_length() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(Command::Green, &mut hw, &mut sink);
    app.tick(UPDATE_INTERVAL_MS, &mut hw);

    let indices: Vec<_> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::SetPixel { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, (0..STRIP_LEN).collect::<Vec<_>>());
}
