//! Registry that configures and polls every encoder in one pass.

use crate::encoder::Encoder;
use crate::port::PortAccess;
use heapless::Vec;

/// Handle to an encoder owned by an [`EncoderManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderId(usize);

impl EncoderId {
    /// Registration order, starting at 0.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Error type for encoder registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderError {
    /// All `N` registry slots are taken.
    RegistryFull,
    /// The id was not issued by this manager.
    UnknownEncoder,
}

/// Ordered collection of up to `N` encoders sharing one port.
///
/// Register every encoder during startup, call [`begin`](Self::begin) once,
/// then call [`poll`](Self::poll) about every millisecond. Polling less often
/// loses half-steps on fast rotation but never fails.
///
/// # Example
///
/// ```ignore
/// let mut encoders: EncoderManager<u8, 4> = EncoderManager::new();
/// let volume = encoders.register(Encoder::new(2, 3, true))?;
/// encoders.set_bounds(volume, 0, 127, false)?;
///
/// encoders.begin(&mut port);
/// loop {
///     if encoders.poll(&mut port) {
///         let level = encoders.value(volume)?;
///     }
/// }
/// ```
#[derive(Debug)]
pub struct EncoderManager<P, const N: usize> {
    encoders: Vec<Encoder<P>, N>,
}

impl<P: Copy, const N: usize> EncoderManager<P, N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            encoders: Vec::new(),
        }
    }

    /// Append an encoder to the poll order.
    ///
    /// Registering after [`begin`](Self::begin) is allowed; the new encoder's
    /// pins are configured by the next `begin`, and its decoder takes its
    /// resting state from the first poll.
    pub fn register(&mut self, encoder: Encoder<P>) -> Result<EncoderId, EncoderError> {
        let id = EncoderId(self.encoders.len());
        self.encoders
            .push(encoder)
            .map_err(|_| EncoderError::RegistryFull)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("registered encoder {}", id.0);
        Ok(id)
    }

    /// Configure every encoder's pins as inputs and sync its decoder.
    ///
    /// Safe to call again; it re-applies the same configuration.
    pub fn begin<A: PortAccess<Pin = P>>(&mut self, port: &mut A) {
        for encoder in &mut self.encoders {
            let (a, b) = encoder.pins();
            port.configure_input(a, encoder.pull_up());
            port.configure_input(b, encoder.pull_up());
            encoder.sync(port.read_pair(a, b));
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("configured {} encoders", self.encoders.len());
    }

    /// Sample and decode every encoder once.
    ///
    /// Returns `true` if any encoder value changed.
    pub fn poll<A: PortAccess<Pin = P>>(&mut self, port: &mut A) -> bool {
        let mut changed = false;
        for encoder in &mut self.encoders {
            let (a, b) = encoder.pins();
            changed |= encoder.step(port.read_pair(a, b));
        }
        changed
    }

    pub fn encoder(&self, id: EncoderId) -> Result<&Encoder<P>, EncoderError> {
        self.encoders
            .get(id.index())
            .ok_or(EncoderError::UnknownEncoder)
    }

    pub fn encoder_mut(&mut self, id: EncoderId) -> Result<&mut Encoder<P>, EncoderError> {
        self.encoders
            .get_mut(id.index())
            .ok_or(EncoderError::UnknownEncoder)
    }

    pub fn value(&self, id: EncoderId) -> Result<i16, EncoderError> {
        self.encoder(id).map(Encoder::value)
    }

    /// Set an encoder's value, applying its current bounds.
    pub fn set_value(&mut self, id: EncoderId, value: i16) -> Result<(), EncoderError> {
        self.encoder_mut(id)?.set_value(value);
        Ok(())
    }

    /// Set an encoder's bounds. See [`Encoder::set_bounds`].
    pub fn set_bounds(
        &mut self,
        id: EncoderId,
        lo: i16,
        hi: i16,
        wrap: bool,
    ) -> Result<(), EncoderError> {
        self.encoder_mut(id)?.set_bounds(lo, hi, wrap);
        Ok(())
    }

    /// Iterate encoders with their ids, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (EncoderId, &Encoder<P>)> {
        self.encoders
            .iter()
            .enumerate()
            .map(|(n, encoder)| (EncoderId(n), encoder))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}

impl<P: Copy, const N: usize> Default for EncoderManager<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::quadrature::PinState;
    use std::vec::Vec as StdVec;

    /// Port with 32 simulated input lines.
    #[derive(Default)]
    struct MockPort {
        levels: u32,
        configured: StdVec<(u8, bool)>,
        reads: usize,
    }

    impl MockPort {
        fn set(&mut self, pin: u8, high: bool) {
            if high {
                self.levels |= 1 << pin;
            } else {
                self.levels &= !(1 << pin);
            }
        }

        /// Drive an encoder's pin pair to a 2-bit state.
        fn drive(&mut self, a: u8, b: u8, bits: u8) {
            let state = PinState::from_bits(bits);
            self.set(a, state.a());
            self.set(b, state.b());
        }
    }

    impl PortAccess for MockPort {
        type Pin = u8;

        fn configure_input(&mut self, pin: u8, pull_up: bool) {
            self.configured.push((pin, pull_up));
        }

        fn read_pair(&mut self, a: u8, b: u8) -> PinState {
            self.reads += 1;
            let word = self.levels;
            PinState::from_levels(word & (1 << a) != 0, word & (1 << b) != 0)
        }
    }

    /// Walk a pin pair through `states`, polling after each.
    fn turn(
        manager: &mut EncoderManager<u8, 4>,
        port: &mut MockPort,
        pins: (u8, u8),
        states: &[u8],
    ) {
        for bits in states {
            port.drive(pins.0, pins.1, *bits);
            manager.poll(port);
        }
    }

    #[test]
    fn test_register_until_full() {
        let mut manager: EncoderManager<u8, 2> = EncoderManager::new();
        assert!(manager.is_empty());
        let first = manager.register(Encoder::new(0, 1, true)).unwrap();
        let second = manager.register(Encoder::new(2, 3, true)).unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(
            manager.register(Encoder::new(4, 5, true)),
            Err(EncoderError::RegistryFull)
        );
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let mut big: EncoderManager<u8, 4> = EncoderManager::new();
        big.register(Encoder::new(0, 1, true)).unwrap();
        let foreign = big.register(Encoder::new(2, 3, true)).unwrap();

        let mut small: EncoderManager<u8, 4> = EncoderManager::new();
        small.register(Encoder::new(0, 1, true)).unwrap();
        assert_eq!(small.value(foreign), Err(EncoderError::UnknownEncoder));
        assert_eq!(
            small.set_value(foreign, 3),
            Err(EncoderError::UnknownEncoder)
        );
    }

    #[test]
    fn test_begin_configures_pins_with_pullups() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        manager.register(Encoder::new(2, 3, true)).unwrap();
        manager.register(Encoder::new(6, 7, false)).unwrap();

        let mut port = MockPort::default();
        manager.begin(&mut port);
        assert_eq!(
            port.configured,
            [(2, true), (3, true), (6, false), (7, false)]
        );

        // Idempotent: same configuration again.
        manager.begin(&mut port);
        assert_eq!(port.configured.len(), 8);
        assert_eq!(
            port.configured[4..],
            [(2, true), (3, true), (6, false), (7, false)]
        );
    }

    #[test]
    fn test_begin_syncs_to_resting_state() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        let id = manager.register(Encoder::new(0, 1, true)).unwrap();

        // Pull-ups idle high: the encoder rests at 11, not 00.
        let mut port = MockPort::default();
        port.drive(0, 1, 0b11);
        manager.begin(&mut port);
        assert!(!manager.poll(&mut port));
        assert_eq!(manager.value(id), Ok(0));

        turn(&mut manager, &mut port, (0, 1), &[0b10, 0b00]);
        assert_eq!(manager.value(id), Ok(1));
    }

    #[test]
    fn test_poll_updates_each_encoder() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        let left = manager.register(Encoder::new(0, 1, true)).unwrap();
        let right = manager.register(Encoder::new(2, 3, true)).unwrap();
        let mut port = MockPort::default();
        manager.begin(&mut port);

        turn(&mut manager, &mut port, (0, 1), &[0b01, 0b11, 0b10, 0b00]);
        turn(&mut manager, &mut port, (2, 3), &[0b10, 0b11]);

        assert_eq!(manager.value(left), Ok(2));
        assert_eq!(manager.value(right), Ok(-1));
    }

    #[test]
    fn test_poll_reads_each_pair_once() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        manager.register(Encoder::new(0, 1, true)).unwrap();
        manager.register(Encoder::new(2, 3, true)).unwrap();
        manager.register(Encoder::new(4, 5, true)).unwrap();
        let mut port = MockPort::default();
        manager.begin(&mut port);

        let before = port.reads;
        manager.poll(&mut port);
        assert_eq!(port.reads - before, 3);
    }

    #[test]
    fn test_poll_without_motion_is_idempotent() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        let a = manager.register(Encoder::new(0, 1, true)).unwrap();
        let b = manager.register(Encoder::new(2, 3, true)).unwrap();
        manager.set_value(a, 7).unwrap();
        manager.set_value(b, -3).unwrap();

        let mut port = MockPort::default();
        port.drive(0, 1, 0b11);
        port.drive(2, 3, 0b01);
        manager.begin(&mut port);

        for _ in 0..100 {
            assert!(!manager.poll(&mut port));
        }
        assert_eq!(manager.value(a), Ok(7));
        assert_eq!(manager.value(b), Ok(-3));
    }

    #[test]
    fn test_clipping_through_manager() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        let id = manager.register(Encoder::new(0, 1, true)).unwrap();
        manager.set_bounds(id, 0, 10, false).unwrap();
        let mut port = MockPort::default();
        manager.begin(&mut port);

        for _ in 0..8 {
            turn(&mut manager, &mut port, (0, 1), &[0b01, 0b11, 0b10, 0b00]);
        }
        assert_eq!(manager.value(id), Ok(10));

        for _ in 0..8 {
            turn(&mut manager, &mut port, (0, 1), &[0b10, 0b11, 0b01, 0b00]);
        }
        assert_eq!(manager.value(id), Ok(0));
    }

    #[test]
    fn test_wraparound_through_manager() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        let id = manager.register(Encoder::new(0, 1, true)).unwrap();
        manager.set_bounds(id, 0, 10, true).unwrap();
        manager.set_value(id, 10).unwrap();
        let mut port = MockPort::default();
        manager.begin(&mut port);

        turn(&mut manager, &mut port, (0, 1), &[0b01, 0b11]);
        assert_eq!(manager.value(id), Ok(0));
    }

    #[test]
    fn test_bounce_through_manager() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        let id = manager.register(Encoder::new(0, 1, true)).unwrap();
        let mut port = MockPort::default();
        manager.begin(&mut port);

        turn(&mut manager, &mut port, (0, 1), &[0b01, 0b00, 0b01, 0b00]);
        assert_eq!(manager.value(id), Ok(0));

        turn(&mut manager, &mut port, (0, 1), &[0b01, 0b11]);
        assert_eq!(manager.value(id), Ok(1));
    }

    #[test]
    fn test_iter_in_registration_order() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        manager.register(Encoder::new(8, 9, true)).unwrap();
        manager.register(Encoder::new(10, 11, true)).unwrap();
        let pins: StdVec<_> = manager
            .iter()
            .map(|(id, e)| (id.index(), e.pins()))
            .collect();
        assert_eq!(pins, [(0, (8, 9)), (1, (10, 11))]);
    }

    #[test]
    fn test_ids_stay_distinct_past_256_encoders() {
        let mut manager: EncoderManager<u8, 300> = EncoderManager::new();
        let ids: StdVec<_> = (0..300)
            .map(|_| manager.register(Encoder::new(0, 1, true)).unwrap())
            .collect();
        assert_eq!(ids[256].index(), 256);
        assert_ne!(ids[256], ids[0]);

        manager.set_value(ids[256], 42).unwrap();
        assert_eq!(manager.value(ids[256]), Ok(42));
        assert_eq!(manager.value(ids[0]), Ok(0));

        let last = manager.iter().last().map(|(id, _)| id);
        assert_eq!(last, Some(ids[299]));
    }

    #[test]
    fn test_late_registration_counts_first_detent() {
        let mut manager: EncoderManager<u8, 4> = EncoderManager::new();
        manager.register(Encoder::new(0, 1, true)).unwrap();
        let mut port = MockPort::default();
        port.drive(0, 1, 0b11);
        port.drive(2, 3, 0b11);
        manager.begin(&mut port);

        let late = manager.register(Encoder::new(2, 3, true)).unwrap();
        manager.begin(&mut port);
        let extra = manager.register(Encoder::new(4, 5, true)).unwrap();
        port.drive(4, 5, 0b11);

        // First poll only picks up the resting state.
        assert!(!manager.poll(&mut port));
        turn(&mut manager, &mut port, (4, 5), &[0b10, 0b00]);
        turn(&mut manager, &mut port, (2, 3), &[0b10, 0b00]);
        assert_eq!(manager.value(extra), Ok(1));
        assert_eq!(manager.value(late), Ok(1));
    }
}
