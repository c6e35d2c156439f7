#![allow(dead_code)] // Fail-soft subsystems log these instead of propagating; variants kept for the port seams

//! Unified error types for the tower firmware.
//!
//! A single `Error` enum every subsystem can convert into, keeping the boot
//! path's error handling uniform. All variants are `Copy` so they can be
//! passed around without allocation. Note that per the fail-soft contract,
//! the Bluetooth subsystems log their `CommsError` and degrade rather than
//! returning it up the stack; only actuator bring-up is fatal.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An actuator write failed.
    Actuator(ActuatorError),
    /// A Bluetooth subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO level write failed.
    GpioWriteFailed,
    /// Pushing a frame out to an LED strip failed.
    StripWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::StripWriteFailed => write!(f, "strip write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

/// Bluetooth bring-up and link failures. These follow the fail-soft
/// contract: the affected channel is marked down and the rest of the
/// firmware keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    BtControllerInitFailed,
    BtControllerEnableFailed,
    BluedroidInitFailed,
    BluedroidEnableFailed,
    GattRegisterFailed,
    AudioSinkInitFailed,
    AudioReconnectFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BtControllerInitFailed => write!(f, "BT controller init failed"),
            Self::BtControllerEnableFailed => write!(f, "BT controller enable failed"),
            Self::BluedroidInitFailed => write!(f, "Bluedroid init failed"),
            Self::BluedroidEnableFailed => write!(f, "Bluedroid enable failed"),
            Self::GattRegisterFailed => write!(f, "GATT registration failed"),
            Self::AudioSinkInitFailed => write!(f, "audio sink init failed"),
            Self::AudioReconnectFailed => write!(f, "audio reconnect failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
