//! RP2040 pin access for the encoder manager.

use defmt::{warn, Format};
use embassy_rp::gpio::{Flex, Pin, Pull};
use embassy_rp::{pac, Peri};
use heapless::Vec;
use untz_core::{PinState, PortAccess};

/// Error type for attaching pins to a [`SioPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum PortError {
    /// All `N` pin slots are taken.
    Full,
}

/// Bank 0 GPIO pins, read through the SIO input register.
///
/// Pins are identified by GPIO number. Each [`read_pair`](PortAccess::read_pair)
/// is a single 32-bit read of `GPIO_IN`, so both levels come from the same
/// instant.
pub struct SioPort<'d, const N: usize> {
    pins: Vec<(u8, Flex<'d>), N>,
}

impl<'d, const N: usize> SioPort<'d, N> {
    #[must_use]
    pub const fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Take ownership of `pin` and return its GPIO number.
    ///
    /// The pin stays unconfigured until
    /// [`EncoderManager::begin`](untz_core::EncoderManager::begin).
    pub fn attach(&mut self, pin: Peri<'d, impl Pin>) -> Result<u8, PortError> {
        let gpio = pin.pin();
        self.pins
            .push((gpio, Flex::new(pin)))
            .map_err(|_| PortError::Full)?;
        Ok(gpio)
    }
}

impl<const N: usize> Default for SioPort<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PortAccess for SioPort<'_, N> {
    type Pin = u8;

    fn configure_input(&mut self, pin: u8, pull_up: bool) {
        let Some((_, flex)) = self.pins.iter_mut().find(|(gpio, _)| *gpio == pin) else {
            warn!("GPIO {} is not attached to the encoder port", pin);
            return;
        };
        flex.set_as_input();
        flex.set_pull(if pull_up { Pull::Up } else { Pull::None });
    }

    fn read_pair(&mut self, a: u8, b: u8) -> PinState {
        let word = pac::SIO.gpio_in(0).read();
        PinState::from_levels(word & (1 << a) != 0, word & (1 << b) != 0)
    }
}
