//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to                  |
//! |------------|-------------------------|------------------------------|
//! | `audio`    | (driven by AudioPort)   | Bluedroid A2DP sink          |
//! | `ble`      | command producer        | Bluedroid BLE GATT server    |
//! | `hardware` | CoilPort, StripPort,    | Coil GPIOs, RMT strips,      |
//! |            | AudioPort               | audio link                   |
//! | `log_sink` | EventSink               | Serial log output            |
//! | `time`     | monotonic clock         | ESP32 system timer           |
//! | `voice`    | command producer        | esp-sr recognizer task       |

pub mod audio;
pub mod ble;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub(super) mod utils;
pub mod voice;
