//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the tower: command
//! dispatch, the stepper drive sequence, and the strip animations.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod light;
pub mod motion;
pub mod ports;
pub mod service;
