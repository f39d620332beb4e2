//! Platform-agnostic core for a tiled key/LED grid with polled rotary encoders.
//!
//! This crate holds everything that does not touch a specific chip, so it can
//! be used in embedded `no_std` firmware and tested on the host.
//!
//! # Overview
//!
//! - [`bounds`]: clip/wrap range policy ([`Bounds`])
//! - [`quadrature`]: half-step quadrature state machine ([`QuadratureDecoder`])
//! - [`encoder`]: one encoder's value, bounds and decoder ([`Encoder`])
//! - [`manager`]: registry that configures and polls all encoders ([`EncoderManager`])
//! - [`port`]: pin capability the manager samples through ([`PortAccess`])
//! - [`matrix`]: 4×4 key/LED module capability ([`MatrixModule`])
//! - [`grid`]: (x, y) ↔ index mapping over 1–8 modules ([`GridMapper`], [`Grid`])
//! - [`trellis`]: HT16K33 Trellis module driver ([`Trellis`])
//!
//! # Example
//!
//! ```rust
//! use untz_core::{Encoder, GridMapper};
//!
//! // Four modules tile into an 8×8 surface.
//! let grid = GridMapper::new(4).unwrap();
//! let index = grid.xy_to_index(6, 2);
//! assert_eq!(grid.index_to_xy(index), (6, 2));
//!
//! // An encoder that wraps 0..=11.
//! let mut semitone = Encoder::new(2u8, 3u8, true);
//! semitone.set_bounds(0, 11, true);
//! semitone.set_value(12);
//! assert_eq!(semitone.value(), 0);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and debug traces (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod bounds;
pub mod encoder;
pub mod grid;
pub mod manager;
pub mod matrix;
pub mod port;
pub mod quadrature;
pub mod trellis;

// Re-export main types at crate root
pub use bounds::{Bounds, Overflow};
pub use encoder::Encoder;
pub use grid::{Grid, GridError, GridMapper};
pub use manager::{EncoderError, EncoderId, EncoderManager};
pub use matrix::{MatrixModule, KEYS_PER_MODULE, MAX_MODULES, MODULE_SIDE};
pub use port::PortAccess;
pub use quadrature::{PinState, QuadratureDecoder, HALF_STEP};
pub use trellis::{BlinkRate, Trellis};

#[cfg(test)]
pub(crate) mod testing {
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    /// Run a future that never waits to completion.
    pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = pin!(f);

        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
        }
    }
}
