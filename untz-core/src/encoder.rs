//! A single polled rotary encoder.

use crate::bounds::Bounds;
use crate::quadrature::{PinState, QuadratureDecoder, HALF_STEP};

/// Rotary encoder on two input pins.
///
/// Holds the current value, its bounds, and the quadrature decoder state. The
/// value only changes through [`set_value`](Self::set_value) or when the
/// owning [`EncoderManager`](crate::EncoderManager) polls a detent.
///
/// # Example
///
/// ```
/// use untz_core::Encoder;
///
/// let mut enc = Encoder::new(2u8, 3u8, true);
/// enc.set_bounds(0, 10, false);
/// enc.set_value(42);
/// assert_eq!(enc.value(), 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoder<P> {
    pin_a: P,
    pin_b: P,
    pull_up: bool,
    value: i16,
    bounds: Bounds,
    decoder: QuadratureDecoder,
    synced: bool,
}

impl<P: Copy> Encoder<P> {
    /// Create an encoder on pins `a` and `b`.
    ///
    /// Use `pull_up = true` for open-drain encoders with the common pin tied
    /// to ground. The value starts at 0 with the full `i16` range, clipped.
    /// The first sample the encoder sees only sets the decoder's resting
    /// state, so an encoder registered after `begin` counts its first detent.
    #[must_use]
    pub const fn new(a: P, b: P, pull_up: bool) -> Self {
        Self {
            pin_a: a,
            pin_b: b,
            pull_up,
            value: 0,
            bounds: Bounds::FULL,
            decoder: QuadratureDecoder::new(PinState::LOW),
            synced: false,
        }
    }

    /// Set the inclusive range and whether to wrap at its ends.
    ///
    /// The current value is left as is; when changing both bounds and value,
    /// set the bounds first.
    pub fn set_bounds(&mut self, lo: i16, hi: i16, wrap: bool) {
        self.bounds = Bounds::new(lo, hi, wrap);
    }

    /// Set the value, clipped or wrapped to the current bounds.
    pub fn set_value(&mut self, value: i16) {
        self.value = self.bounds.apply(i32::from(value));
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> i16 {
        self.value
    }

    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Pin pair as `(a, b)`.
    #[inline]
    #[must_use]
    pub const fn pins(&self) -> (P, P) {
        (self.pin_a, self.pin_b)
    }

    #[inline]
    #[must_use]
    pub const fn pull_up(&self) -> bool {
        self.pull_up
    }

    /// Resynchronize the decoder with the pins without counting motion.
    pub(crate) fn sync(&mut self, sample: PinState) {
        self.decoder.reset(sample);
        self.synced = true;
    }

    /// Decode one sample. Returns `true` if the value changed.
    pub(crate) fn step(&mut self, sample: PinState) -> bool {
        if !self.synced {
            self.sync(sample);
            return false;
        }
        let delta = self.decoder.update(sample);
        if delta == 0 {
            return false;
        }
        let previous = self.value;
        let clicks = i32::from(delta / HALF_STEP);
        self.value = self.bounds.apply(i32::from(previous) + clicks);
        self.value != previous
    }
}
