//! GPIO / peripheral pin assignments for the tower main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Stepper motor (unipolar, coil lines driven directly)
// ---------------------------------------------------------------------------

/// Coil A line (winding A+). Held low through the whole drive sequence;
/// the sequencer in `app::motion` never energizes it.
pub const COIL_A_GPIO: i32 = 14;
/// Coil B line (winding A−).
pub const COIL_B_GPIO: i32 = 27;
/// Coil C line (winding B+).
pub const COIL_C_GPIO: i32 = 26;
/// Coil D line (winding B−).
pub const COIL_D_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Addressable LED strips (WS2812-class, GRB, 800 kHz)
// ---------------------------------------------------------------------------

/// Data line for strip A.
pub const STRIP_A_GPIO: i32 = 12;
/// Data line for strip B.
pub const STRIP_B_GPIO: i32 = 13;
/// Pixels per strip. Both strips are the same length and are always driven
/// as a pair (A first, then B).
pub const STRIP_PIXELS: usize = 14;

// ---------------------------------------------------------------------------
// Audio codec (ES8311) — control and data path
// ---------------------------------------------------------------------------

/// I²C control bus to the codec.
pub const CODEC_I2C_SDA_GPIO: i32 = 23;
pub const CODEC_I2C_SCL_GPIO: i32 = 22;

/// I²S serial clock.
pub const I2S_SCLK_GPIO: i32 = 19;
/// I²S serial data into the codec.
pub const I2S_DSDIN_GPIO: i32 = 5;
/// I²S word clock.
pub const I2S_LRCK_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Auxiliary power rail
// ---------------------------------------------------------------------------

/// Enable line for the auxiliary rail (amplifier stage). Driven HIGH at the
/// end of boot, after the actuators are in their idle state.
pub const AUX_POWER_GPIO: i32 = 15;
