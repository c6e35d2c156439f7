//! Tower firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;

// Platform halves inside these are cfg-guarded; the host sides carry the
// simulation stubs the tests drive.
pub mod adapters;
pub mod drivers;

mod pins;
