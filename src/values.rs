//! Encoder values shared between the polling task and the rest of the firmware.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicI16, Ordering};
use untz_core::EncoderManager;

/// Latest value of each encoder.
///
/// The polling task owns the [`EncoderManager`] and copies values here after
/// every poll that changed something; readers load them atomically from any
/// task or interrupt. The signal wakes one waiter per batch of changes.
pub struct EncoderValues<const N: usize> {
    slots: [AtomicI16; N],
    changed: Signal<CriticalSectionRawMutex, ()>,
}

impl<const N: usize> EncoderValues<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicI16::new(0) }; N],
            changed: Signal::new(),
        }
    }

    /// Copy every encoder value from `manager` and wake the waiter.
    pub fn publish<P: Copy, const M: usize>(&self, manager: &EncoderManager<P, M>) {
        for (id, encoder) in manager.iter() {
            if let Some(slot) = self.slots.get(id.index()) {
                slot.store(encoder.value(), Ordering::Relaxed);
            }
        }
        self.changed.signal(());
    }

    /// Value of encoder `n`, or `None` past the last slot.
    pub fn get(&self, n: usize) -> Option<i16> {
        self.slots.get(n).map(|slot| slot.load(Ordering::Relaxed))
    }

    /// All values at once.
    pub fn snapshot(&self) -> [i16; N] {
        core::array::from_fn(|n| self.slots[n].load(Ordering::Relaxed))
    }

    /// Wait until the next [`publish`](Self::publish).
    pub async fn wait(&self) {
        self.changed.wait().await;
    }
}

impl<const N: usize> Default for EncoderValues<N> {
    fn default() -> Self {
        Self::new()
    }
}
