//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters, and protocol constants live
//! here so they can be tuned in one place.

use crate::filter::DEFAULT_FILTER_LEN;
use crate::gesture::{Combo, GestureAction, KeyId};

// GPIO pin assignments (nRF52840)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` are
// selected in `main.rs`. Adjust for your PCB.
//
//   Encoder A (azimuth)    CHA → P1.01   CHB → P1.02   SW → P1.03
//   Encoder B (elevation)  CHA → P1.04   CHB → P1.05   SW → P1.06
//   Volume pot             AIN0 (P0.02)
//   Distance pot           AIN1 (P0.03)
//   Battery sense          AIN2 (P0.04), 1:4 divider
//   UART TX / RX           P0.06 / P0.08  (115200 8N1)
//   I²C SDA / SCL          P0.26 / P0.27
//   Heartbeat LED          P0.13
//   Low-battery LED        P0.14
//   Op-amp low-power EN    P0.15 (held low)

// Encoders & gestures

/// Key id pushed by encoder A's switch.
pub const KEY_A: KeyId = KeyId::of(1);

/// Key id pushed by encoder B's switch.
pub const KEY_B: KeyId = KeyId::of(2);

/// Number of presses a combo spans (and gesture ring capacity).
pub const COMBO_LEN: usize = 3;

/// Combos checked after every encoder cycle, first match wins.
pub const COMBOS: [Combo<COMBO_LEN>; 2] = [
    Combo::new([KEY_A, KEY_A, KEY_B], GestureAction::TogglePower),
    Combo::new([KEY_A, KEY_B, KEY_B], GestureAction::ChangeChannel),
];

/// Lowest steering angle an encoder can reach (degrees).
pub const ENCODER_MIN: i32 = -30;

/// Highest steering angle an encoder can reach (degrees).
pub const ENCODER_MAX: i32 = 30;

/// Bounded wait for an encoder channel edge before polling the switch (ms).
pub const ENCODER_POLL_TIMEOUT_MS: u64 = 10;

/// Period of the long-press tick timer (ms).
pub const PRESS_TICK_MS: u64 = 10;

/// Bounded wait for the gesture buffer lock (ms). Expiry skips the cycle.
pub const GESTURE_LOCK_TIMEOUT_MS: u64 = 10;

// Analog inputs

/// Running-average window for every analog channel.
pub const FILTER_LEN: usize = DEFAULT_FILTER_LEN;

/// Potentiometer sampling period (ms).
pub const POT_SAMPLE_PERIOD_MS: u64 = 10;

/// Battery sampling period (ms).
pub const BATTERY_SAMPLE_PERIOD_MS: u64 = 1000;

/// Bounded wait for one SAADC conversion (ms).
pub const ADC_READ_TIMEOUT_MS: u64 = 5;

/// SAADC full-scale input with gain 1/6 and the 0.6 V internal reference (mV).
pub const ADC_FULL_SCALE_MV: i32 = 3600;

/// Highest code at 12-bit resolution.
pub const ADC_MAX_CODE: i32 = 4095;

/// Pot wiper voltage at the 100 % end of travel (mV).
pub const POT_MIN_MV: i32 = 100;

/// Pot wiper voltage at the 0 % end of travel (mV).
pub const POT_MAX_MV: i32 = 1100;

/// Battery sense divider ratio.
pub const BATTERY_DIVIDER: f32 = 4.0;

/// Above this the battery reads as full (V).
pub const BATTERY_FULL_VOLTS: f32 = 3.9;

/// Above this (and not full) the battery reads as medium (V).
pub const BATTERY_MEDIUM_VOLTS: f32 = 3.4;

// Serial link

/// Transmit loop period (ms).
pub const TX_PERIOD_MS: u64 = 10;

/// Receive buffer; a burst this long is delivered without waiting for idle.
pub const RX_BUFFER_LEN: usize = 64;

/// Log every transmitted frame.
pub const VERBOSE_TX: bool = true;

// Heartbeat & display

/// Heartbeat LED toggle period (ms).
pub const HEARTBEAT_PERIOD_MS: u64 = 100;

/// Status display redraw period (ms).
pub const DISPLAY_REFRESH_MS: u64 = 50;
