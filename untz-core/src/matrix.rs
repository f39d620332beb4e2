//! Matrix-module capability: one 4×4 block of keys with an LED under each.

use core::future::Future;

/// Keys (and LEDs) along one side of a module.
pub const MODULE_SIDE: u8 = 4;

/// Keys (and LEDs) on one module.
pub const KEYS_PER_MODULE: u8 = MODULE_SIDE * MODULE_SIDE;

/// Most modules a grid can be built from.
pub const MAX_MODULES: usize = 8;

/// One 4×4 key/LED module.
///
/// Keys are numbered row-major, `0..16`. LED state is buffered locally and
/// sent with [`write_display`](Self::write_display); key state is refreshed
/// by [`read_switches`](Self::read_switches). Out-of-range key numbers are
/// ignored (set/clear) or read as `false`.
pub trait MatrixModule {
    /// Error returned by bus operations.
    type Error;

    /// Turn on the LED under `key` in the local buffer.
    fn set_led(&mut self, key: u8);

    /// Turn off the LED under `key` in the local buffer.
    fn clear_led(&mut self, key: u8);

    /// Whether the buffered LED under `key` is on.
    fn is_led_set(&self, key: u8) -> bool;

    /// Whether `key` was down in the latest scan.
    fn is_key_pressed(&self, key: u8) -> bool;

    /// Whether `key` was down in the scan before the latest one.
    fn was_key_pressed(&self, key: u8) -> bool;

    /// Key went down between the last two scans.
    fn just_pressed(&self, key: u8) -> bool {
        self.is_key_pressed(key) && !self.was_key_pressed(key)
    }

    /// Key went up between the last two scans.
    fn just_released(&self, key: u8) -> bool {
        !self.is_key_pressed(key) && self.was_key_pressed(key)
    }

    /// Push the LED buffer to the hardware.
    fn write_display(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Scan the keys. Resolves to `true` if any key changed since the last scan.
    fn read_switches(&mut self) -> impl Future<Output = Result<bool, Self::Error>>;
}
