//! GPIO pin assignments for the Cosmo Pager main board (XIAO ESP32-S3).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// User inputs (all active-low with internal pull-ups)
// ---------------------------------------------------------------------------

/// Momentary push-button (D0).
pub const BUTTON_GPIO: i32 = 1;

/// Encoder 1 clock line (D1).
pub const ENC1_CLK_GPIO: i32 = 2;
/// Encoder 1 data line (D2).
pub const ENC1_DT_GPIO: i32 = 3;

/// Encoder 2 clock line (D3).
pub const ENC2_CLK_GPIO: i32 = 4;
/// Encoder 2 data line (D4).
pub const ENC2_DT_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, LEDC-driven)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

/// LEDC base frequency for the RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
