//! HT16K33-based Trellis 4×4 key/LED module over async I2C.

use crate::matrix::{MatrixModule, KEYS_PER_MODULE};
use embedded_hal_async::i2c::I2c;

/// Default address of the first module; jumpers select `0x70..=0x77`.
pub const BASE_ADDRESS: u8 = 0x70;

/// Highest brightness level.
pub const MAX_BRIGHTNESS: u8 = 15;

const CMD_OSCILLATOR_ON: u8 = 0x21;
const CMD_DISPLAY: u8 = 0x80;
const DISPLAY_ON: u8 = 0x01;
const CMD_BRIGHTNESS: u8 = 0xE0;
const CMD_KEY_INT_ACTIVE_LOW: u8 = 0xA1;
const REG_DISPLAY_RAM: u8 = 0x00;
const REG_KEY_DATA: u8 = 0x40;

const DISPLAY_ROWS: usize = 8;
const KEY_BYTES: usize = 6;

/// Display RAM bit for each key's LED, as `row << 4 | bit`.
const LED_LUT: [u8; 16] = [
    0x3A, 0x37, 0x35, 0x34, //
    0x28, 0x29, 0x23, 0x24, //
    0x16, 0x1B, 0x11, 0x10, //
    0x0E, 0x0D, 0x0C, 0x02, //
];

/// Key RAM bit for each key, as `byte << 4 | bit`.
const KEY_LUT: [u8; 16] = [
    0x07, 0x04, 0x02, 0x22, //
    0x05, 0x06, 0x00, 0x01, //
    0x03, 0x10, 0x30, 0x21, //
    0x13, 0x12, 0x11, 0x31, //
];

/// Hardware blink modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkRate {
    #[default]
    Off = 0,
    TwoHz = 1,
    OneHz = 2,
    HalfHz = 3,
}

/// One Trellis module: an HT16K33 driving 16 LEDs and scanning 16 keys.
///
/// LED changes go to a local buffer until [`write_display`](MatrixModule::write_display).
///
/// # Example
///
/// ```ignore
/// use untz_core::{MatrixModule, Trellis};
///
/// // `i2c` is any `embedded-hal-async` I2C implementation
/// let mut trellis = Trellis::new(i2c, 0x70);
/// trellis.begin().await?;
/// trellis.set_led(0);
/// trellis.write_display().await?;
/// ```
pub struct Trellis<I2C> {
    i2c: I2C,
    address: u8,
    display: [u16; DISPLAY_ROWS],
    keys: [u8; KEY_BYTES],
    last_keys: [u8; KEY_BYTES],
}

impl<I2C: I2c> Trellis<I2C> {
    /// Create a driver for the module at 7-bit `address`. No bus traffic.
    #[must_use]
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            display: [0; DISPLAY_ROWS],
            keys: [0; KEY_BYTES],
            last_keys: [0; KEY_BYTES],
        }
    }

    #[inline]
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Start the oscillator, enable the display at full brightness and turn
    /// on the key interrupt.
    pub async fn begin(&mut self) -> Result<(), I2C::Error> {
        self.command(CMD_OSCILLATOR_ON).await?;
        self.set_blink_rate(BlinkRate::Off).await?;
        self.set_brightness(MAX_BRIGHTNESS).await?;
        self.command(CMD_KEY_INT_ACTIVE_LOW).await
    }

    /// Set LED brightness, `0..=15`; larger values are capped.
    pub async fn set_brightness(&mut self, level: u8) -> Result<(), I2C::Error> {
        self.command(CMD_BRIGHTNESS | level.min(MAX_BRIGHTNESS)).await
    }

    pub async fn set_blink_rate(&mut self, rate: BlinkRate) -> Result<(), I2C::Error> {
        self.command(CMD_DISPLAY | DISPLAY_ON | ((rate as u8) << 1)).await
    }

    /// Release the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn command(&mut self, command: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[command]).await
    }

    fn led_bit(key: u8) -> Option<(usize, u16)> {
        let code = *LED_LUT.get(usize::from(key))?;
        Some((usize::from(code >> 4), 1 << (code & 0x0F)))
    }

    fn key_bit(keys: &[u8; KEY_BYTES], key: u8) -> bool {
        KEY_LUT.get(usize::from(key)).is_some_and(|&code| {
            keys[usize::from(code >> 4)] & (1 << (code & 0x0F)) != 0
        })
    }
}

impl<I2C: I2c> MatrixModule for Trellis<I2C> {
    type Error = I2C::Error;

    fn set_led(&mut self, key: u8) {
        if let Some((row, bit)) = Self::led_bit(key) {
            self.display[row] |= bit;
        }
    }

    fn clear_led(&mut self, key: u8) {
        if let Some((row, bit)) = Self::led_bit(key) {
            self.display[row] &= !bit;
        }
    }

    fn is_led_set(&self, key: u8) -> bool {
        Self::led_bit(key).is_some_and(|(row, bit)| self.display[row] & bit != 0)
    }

    fn is_key_pressed(&self, key: u8) -> bool {
        key < KEYS_PER_MODULE && Self::key_bit(&self.keys, key)
    }

    fn was_key_pressed(&self, key: u8) -> bool {
        key < KEYS_PER_MODULE && Self::key_bit(&self.last_keys, key)
    }

    async fn write_display(&mut self) -> Result<(), Self::Error> {
        let mut frame = [0u8; 1 + 2 * DISPLAY_ROWS];
        frame[0] = REG_DISPLAY_RAM;
        for (chunk, row) in frame[1..].chunks_exact_mut(2).zip(self.display) {
            chunk.copy_from_slice(&row.to_le_bytes());
        }
        self.i2c.write(self.address, &frame).await
    }

    async fn read_switches(&mut self) -> Result<bool, Self::Error> {
        self.last_keys = self.keys;
        self.i2c
            .write_read(self.address, &[REG_KEY_DATA], &mut self.keys)
            .await?;
        Ok(self.keys != self.last_keys)
    }
}
