//! Fuzz target: application command sessions
//!
//! Interprets the input as a script of (command byte, time gap) pairs and
//! replays it against the application service, checking the drive safety
//! invariants after every step: coil line A stays low, and a motor that
//! is not running holds its coils de-energized.
//!
//! cargo fuzz run fuzz_command_session

#![no_main]

use libfuzzer_sys::fuzz_target;
use rgb::RGB8;
use towerfw::app::commands::Command;
use towerfw::app::events::AppEvent;
use towerfw::app::motion::CoilPattern;
use towerfw::app::ports::{AudioPort, CoilPort, EventSink, StripPort};
use towerfw::app::service::AppService;

struct Rig {
    coils: CoilPattern,
    line_a_seen: bool,
}

impl CoilPort for Rig {
    fn apply_coils(&mut self, pattern: CoilPattern) {
        self.coils = pattern;
        self.line_a_seen |= pattern.a;
    }

    fn release_coils(&mut self) {
        self.coils = CoilPattern::OFF;
    }
}

impl StripPort for Rig {
    fn strip_len(&self) -> usize {
        14
    }

    fn clear(&mut self) {}
    fn set_pixel(&mut self, _index: usize, _color: RGB8) {}
    fn flush(&mut self) {}
}

impl AudioPort for Rig {
    fn audio_begin(&mut self) {}
    fn audio_reconnect(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut app = AppService::new();
    let mut rig = Rig {
        coils: CoilPattern::OFF,
        line_a_seen: false,
    };
    let mut sink = NullSink;
    app.start(&mut rig, &mut sink);

    let mut now = 0u32;
    for pair in data.chunks_exact(2) {
        // Out-of-range command bytes are skipped, same as unknown tokens.
        if let Some(command) = Command::from_u8(pair[0]) {
            app.handle_command(command, &mut rig, &mut sink);
        }
        now = now.wrapping_add(u32::from(pair[1]));
        app.tick(now, &mut rig);

        assert!(!rig.line_a_seen, "line A driven high");
        if !app.motor_running() {
            assert!(
                rig.coils.is_de_energized(),
                "coils energized while the motor is stopped"
            );
        }
    }
});
