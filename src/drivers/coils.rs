//! Stepper coil driver (ULN2003-style darlington array, four lines).
//!
//! Translates a [`CoilPattern`] into the four GPIO levels in one call.
//! The drive sequence itself lives in the motion controller; this driver
//! is a dumb actuator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::app::motion::CoilPattern;
use crate::drivers::hw_init;
use crate::pins;

pub struct CoilDriver {
    pattern: CoilPattern,
}

impl CoilDriver {
    pub fn new() -> Self {
        Self {
            pattern: CoilPattern::OFF,
        }
    }

    /// Drive all four lines to `pattern`, A through D in pin order.
    pub fn apply(&mut self, pattern: CoilPattern) {
        hw_init::gpio_write(pins::COIL_A_GPIO, pattern.a);
        hw_init::gpio_write(pins::COIL_B_GPIO, pattern.b);
        hw_init::gpio_write(pins::COIL_C_GPIO, pattern.c);
        hw_init::gpio_write(pins::COIL_D_GPIO, pattern.d);
        self.pattern = pattern;
    }

    /// All lines low. The resting state; windings de-energized.
    pub fn release(&mut self) {
        self.apply(CoilPattern::OFF);
    }

    /// Pattern currently on the pins.
    pub fn pattern(&self) -> CoilPattern {
        self.pattern
    }

    pub fn is_de_energized(&self) -> bool {
        self.pattern.is_de_energized()
    }
}

impl Default for CoilDriver {
    fn default() -> Self {
        Self::new()
    }
}
