//! Polled quadrature decoding at half-step granularity.
//!
//! Each poll combines the previous and current 2-bit pin states into a 4-bit
//! key. Valid Gray-code transitions give one sub-step in either direction;
//! two sub-steps in the same direction make one half-step (a detent click on
//! encoders with two transitions per detent).
//!
//! ```text
//!   state = B<<1 | A
//!   forward:  00 -> 01 -> 11 -> 10 -> 00
//!   backward: 00 -> 10 -> 11 -> 01 -> 00
//! ```

/// Magnitude of the delta reported for one half-step.
pub const HALF_STEP: i8 = 2;

/// Sub-step for each `previous << 2 | current` key.
///
/// Unchanged states and double-bit jumps are both 0.
const TRANSITIONS: [i8; 16] = [
    0, 1, -1, 0, // from 00
    -1, 0, 0, 1, // from 01
    1, 0, 0, -1, // from 10
    0, -1, 1, 0, // from 11
];

/// Two-bit sample of an encoder's pin pair: bit 0 is pin A, bit 1 is pin B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinState(u8);

impl PinState {
    /// Both pins low.
    pub const LOW: Self = Self(0);

    /// Build a sample from the two pin levels.
    #[inline]
    #[must_use]
    pub const fn from_levels(a: bool, b: bool) -> Self {
        Self((a as u8) | ((b as u8) << 1))
    }

    /// Build a sample from raw bits; anything above bit 1 is dropped.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn a(self) -> bool {
        self.0 & 0b01 != 0
    }

    #[inline]
    #[must_use]
    pub const fn b(self) -> bool {
        self.0 & 0b10 != 0
    }
}

/// Per-encoder decoder state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    /// Last state reached through a valid transition.
    state: PinState,
    /// Sub-steps seen since the last reported half-step.
    pending: i8,
}

impl QuadratureDecoder {
    #[must_use]
    pub const fn new(initial: PinState) -> Self {
        Self {
            state: initial,
            pending: 0,
        }
    }

    /// Resynchronize to `state` and drop partial motion.
    pub fn reset(&mut self, state: PinState) {
        self.state = state;
        self.pending = 0;
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> PinState {
        self.state
    }

    /// Feed one sample and return the half-step delta: `-2`, `0` or `+2`.
    ///
    /// Samples that do not form a valid transition from the saved state are
    /// ignored and leave the decoder as it was.
    pub fn update(&mut self, sample: PinState) -> i8 {
        let key = (self.state.bits() << 2) | sample.bits();
        let sub_step = TRANSITIONS[usize::from(key)];
        if sub_step == 0 {
            return 0;
        }

        self.state = sample;
        self.pending += sub_step;
        if self.pending.abs() >= HALF_STEP {
            let delta = self.pending.signum() * HALF_STEP;
            self.pending = 0;
            delta
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S00: PinState = PinState::from_bits(0b00);
    const S01: PinState = PinState::from_bits(0b01);
    const S10: PinState = PinState::from_bits(0b10);
    const S11: PinState = PinState::from_bits(0b11);

    fn run(decoder: &mut QuadratureDecoder, samples: &[PinState]) -> i32 {
        samples
            .iter()
            .map(|s| i32::from(decoder.update(*s)))
            .sum()
    }

    #[test]
    fn test_pin_state_levels() {
        let state = PinState::from_levels(true, false);
        assert!(state.a());
        assert!(!state.b());
        assert_eq!(state.bits(), 0b01);
        assert_eq!(PinState::from_bits(0xFF).bits(), 0b11);
    }

    #[test]
    fn test_forward_detent_is_one_half_step() {
        let mut decoder = QuadratureDecoder::new(S00);
        assert_eq!(decoder.update(S01), 0);
        assert_eq!(decoder.update(S11), HALF_STEP);
        assert_eq!(decoder.state(), S11);
    }

    #[test]
    fn test_backward_detent_is_negative_half_step() {
        let mut decoder = QuadratureDecoder::new(S11);
        assert_eq!(decoder.update(S01), 0);
        assert_eq!(decoder.update(S00), -HALF_STEP);
    }

    #[test]
    fn test_full_cycle_gives_two_half_steps() {
        let mut decoder = QuadratureDecoder::new(S00);
        assert_eq!(run(&mut decoder, &[S01, S11, S10, S00]), 4);
        assert_eq!(run(&mut decoder, &[S10, S11, S01, S00]), -4);
    }

    #[test]
    fn test_bounce_cancels_out() {
        let mut decoder = QuadratureDecoder::new(S00);
        assert_eq!(run(&mut decoder, &[S01, S00, S01, S00]), 0);
        assert_eq!(decoder.state(), S00);
    }

    #[test]
    fn test_bounce_then_clean_step_counts_once() {
        let mut decoder = QuadratureDecoder::new(S00);
        assert_eq!(run(&mut decoder, &[S01, S00, S01, S11]), i32::from(HALF_STEP));
    }

    #[test]
    fn test_double_bit_jump_is_ignored() {
        let mut decoder = QuadratureDecoder::new(S00);
        assert_eq!(decoder.update(S11), 0);
        assert_eq!(decoder.state(), S00);

        // Partial motion survives an invalid sample.
        assert_eq!(decoder.update(S01), 0);
        assert_eq!(decoder.update(S10), 0);
        assert_eq!(decoder.update(S11), HALF_STEP);
    }

    #[test]
    fn test_no_change_is_zero() {
        let mut decoder = QuadratureDecoder::new(S10);
        for _ in 0..10 {
            assert_eq!(decoder.update(S10), 0);
        }
        assert_eq!(decoder, QuadratureDecoder::new(S10));
    }

    #[test]
    fn test_reset_drops_partial_motion() {
        let mut decoder = QuadratureDecoder::new(S00);
        decoder.update(S01);
        decoder.reset(S11);
        assert_eq!(decoder, QuadratureDecoder::new(S11));
    }
}
