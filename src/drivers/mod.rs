//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod coils;
pub mod hw_init;
pub mod strip;
