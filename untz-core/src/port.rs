//! Pin/port capability consumed by the encoder manager.

use crate::quadrature::PinState;

/// Access to the digital inputs an encoder is wired to.
///
/// Implementations hide the register layout of the target: the pin type,
/// register width and how pins are configured are all target-specific.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait PortAccess {
    /// Target pin identifier (GPIO number, port/bit pair, ...).
    type Pin: Copy;

    /// Configure `pin` as a digital input, optionally with its pull-up enabled.
    fn configure_input(&mut self, pin: Self::Pin, pull_up: bool);

    /// Sample both pins at the same instant.
    ///
    /// Implementations must take both bits from a single register read so the
    /// two levels cannot be skewed in time.
    fn read_pair(&mut self, a: Self::Pin, b: Self::Pin) -> PinState;
}
