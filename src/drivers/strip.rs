//! WS2812 addressable LED strip driver.
//!
//! One driver instance per physical strip. Pixel writes land in a local
//! framebuffer; [`flush`](StripDriver::flush) serializes the whole frame
//! onto the data line in one RMT transmission (24 bits per pixel, GRB
//! byte order, most significant bit first, 800 kHz line rate).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: owns an RMT TX channel and transmits real waveforms.
//! On host/test: records the last flushed frame for inspection.

use rgb::RGB8;

use crate::pins;

#[cfg(target_os = "espidf")]
use core::time::Duration;

#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    gpio::AnyOutputPin,
    peripheral::Peripheral,
    rmt::{config::TransmitConfig, FixedLengthSignal, PinState, Pulse, RmtChannel, TxRmtDriver},
};

#[cfg(target_os = "espidf")]
use super::hw_init::HwInitError;
use crate::error::ActuatorError;

/// Pulse pairs per frame: 24 bits for each pixel.
#[cfg(target_os = "espidf")]
const FRAME_BITS: usize = pins::STRIP_PIXELS * 24;

// WS2812 bit timing in nanoseconds (datasheet nominal, ±150 ns slack).
#[cfg(target_os = "espidf")]
const T0H_NS: u64 = 350;
#[cfg(target_os = "espidf")]
const T0L_NS: u64 = 800;
#[cfg(target_os = "espidf")]
const T1H_NS: u64 = 700;
#[cfg(target_os = "espidf")]
const T1L_NS: u64 = 600;

pub struct StripDriver {
    label: &'static str,
    pixels: [RGB8; pins::STRIP_PIXELS],
    #[cfg(target_os = "espidf")]
    tx: TxRmtDriver<'static>,
    /// Pulse pair encoding a zero bit at the channel's counter clock.
    #[cfg(target_os = "espidf")]
    zero: (Pulse, Pulse),
    /// Pulse pair encoding a one bit.
    #[cfg(target_os = "espidf")]
    one: (Pulse, Pulse),
    #[cfg(not(target_os = "espidf"))]
    last_flushed: Option<[RGB8; pins::STRIP_PIXELS]>,
    #[cfg(not(target_os = "espidf"))]
    flush_count: u32,
}

impl StripDriver {
    /// Claim an RMT channel for `pin` and pre-compute the bit pulses.
    ///
    /// The strip starts dark in the framebuffer only — callers flush
    /// during boot to make the hardware match.
    #[cfg(target_os = "espidf")]
    pub fn new(
        label: &'static str,
        channel: impl Peripheral<P = impl RmtChannel> + 'static,
        pin: i32,
    ) -> Result<Self, HwInitError> {
        // SAFETY: the pin map assigns each strip line to exactly one
        // driver; the pin is wrapped once here and owned by the RMT
        // channel from then on.
        let pin = unsafe { AnyOutputPin::new(pin) };
        let config = TransmitConfig::new().clock_divider(1);
        let tx = TxRmtDriver::new(channel, pin, &config)
            .map_err(|e| HwInitError::RmtInitFailed(e.code()))?;

        let ticks_hz = tx
            .counter_clock()
            .map_err(|e| HwInitError::RmtInitFailed(e.code()))?;
        let pulse = |state, ns| {
            Pulse::new_with_duration(ticks_hz, state, &Duration::from_nanos(ns))
                .map_err(|e| HwInitError::RmtInitFailed(e.code()))
        };
        let zero = (pulse(PinState::High, T0H_NS)?, pulse(PinState::Low, T0L_NS)?);
        let one = (pulse(PinState::High, T1H_NS)?, pulse(PinState::Low, T1L_NS)?);

        log::info!("strip driver up: {} ({} px)", label, pins::STRIP_PIXELS);
        Ok(Self {
            label,
            pixels: [RGB8::new(0, 0, 0); pins::STRIP_PIXELS],
            tx,
            zero,
            one,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            pixels: [RGB8::new(0, 0, 0); pins::STRIP_PIXELS],
            last_flushed: None,
            flush_count: 0,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn len(&self) -> usize {
        pins::STRIP_PIXELS
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero the framebuffer. Takes effect on the next flush.
    pub fn clear(&mut self) {
        self.pixels = [RGB8::new(0, 0, 0); pins::STRIP_PIXELS];
    }

    /// Stage one pixel. Out-of-range indices are ignored.
    pub fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = color;
        }
    }

    /// Transmit the framebuffer: every pixel as G-R-B, MSB first.
    #[cfg(target_os = "espidf")]
    pub fn flush(&mut self) -> Result<(), ActuatorError> {
        let mut signal = FixedLengthSignal::<FRAME_BITS>::new();
        for (pixel_index, px) in self.pixels.iter().enumerate() {
            let grb = (u32::from(px.g) << 16) | (u32::from(px.r) << 8) | u32::from(px.b);
            for bit in 0..24 {
                let pair = if grb & (1 << (23 - bit)) != 0 {
                    self.one
                } else {
                    self.zero
                };
                signal
                    .set(pixel_index * 24 + bit, &pair)
                    .map_err(|_| ActuatorError::StripWriteFailed)?;
            }
        }
        self.tx
            .start_blocking(&signal)
            .map_err(|_| ActuatorError::StripWriteFailed)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn flush(&mut self) -> Result<(), ActuatorError> {
        self.last_flushed = Some(self.pixels);
        self.flush_count += 1;
        Ok(())
    }

    // ── Host-side inspection (simulation only) ────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn last_flushed(&self) -> Option<&[RGB8; pins::STRIP_PIXELS]> {
        self.last_flushed.as_ref()
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn flush_count(&self) -> u32 {
        self.flush_count
    }
}
