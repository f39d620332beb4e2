//! Board configuration: pins, addresses, timing and encoder ranges.
//!
//! | Function        | GPIO   | Description |
//! |-----------------|--------|-------------|
//! | I2C0 SDA        | 4      | Trellis bus data |
//! | I2C0 SCL        | 5      | Trellis bus clock |
//! | Encoder 0 A/B   | 10, 11 | Brightness |
//! | Encoder 1 A/B   | 12, 13 | Blink rate |
//! | Encoder 2 A/B   | 14, 15 | User value |
//! | Encoder 3 A/B   | 16, 17 | User value |

/// Number of rotary encoders.
pub const ENCODER_COUNT: usize = 4;

/// Input pins claimed by encoders (two per encoder).
pub const ENCODER_PIN_COUNT: usize = 2 * ENCODER_COUNT;

/// Encoders are open-drain with the common pin tied to ground.
pub const ENCODER_PULL_UP: bool = true;

/// Initial range and value of each encoder: `(lo, hi, wrap, value)`.
pub const ENCODER_SETUP: [(i16, i16, bool, i16); ENCODER_COUNT] = [
    (0, 15, false, 15), // brightness
    (0, 3, true, 0),    // blink rate
    (0, 127, false, 64),
    (0, 127, false, 64),
];

/// Encoder poll period. Longer periods drop half-steps on fast turns.
pub const POLL_PERIOD_US: u64 = 1_000;

/// Key scan period.
pub const SCAN_PERIOD_MS: u64 = 30;

/// Trellis I2C bus frequency.
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// I2C address of each Trellis module, in slot order.
#[cfg(feature = "grid-4x4")]
pub const MODULE_ADDRESSES: &[u8] = &[0x70];

/// I2C address of each Trellis module, in slot order.
#[cfg(feature = "grid-8x8")]
pub const MODULE_ADDRESSES: &[u8] = &[0x70, 0x71, 0x72, 0x73];

/// I2C address of each Trellis module, in slot order.
#[cfg(feature = "grid-16x8")]
pub const MODULE_ADDRESSES: &[u8] = &[0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x77];
