//! Fuzz target: BLE characteristic write decoding
//!
//! Drives arbitrary byte sequences through the sanitise-then-decode path
//! of the command characteristic and asserts the filter invariants:
//! bounded output, printable ASCII only, and decoding that accepts
//! exactly the vocabulary tokens.
//!
//! cargo fuzz run fuzz_ble_write

#![no_main]

use libfuzzer_sys::fuzz_target;
use towerfw::adapters::ble::{MAX_COMMAND_LEN, decode_write, sanitize_token};

fuzz_target!(|data: &[u8]| {
    let token = sanitize_token(data);
    assert!(token.len() <= MAX_COMMAND_LEN, "token exceeds the buffer cap");
    assert!(
        token.bytes().all(|b| (0x20..=0x7e).contains(&b)),
        "non-printable byte survived the filter"
    );

    // A decoded command always matches the sanitised token verbatim.
    if let Some(command) = decode_write(data) {
        assert_eq!(command.token(), token.as_str());
    }
});
