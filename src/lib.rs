//! Tiled button/LED grid controller firmware for RP2040.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Scans one to eight Trellis 4×4 key/LED modules over I2C
//! 2. Polls rotary encoders every millisecond through the SIO input register
//! 3. Toggles the LED under each pressed key and follows encoder changes
//!
//! # Hardware Configuration
//!
//! See [`config`] for the pin table, module addresses and timing.
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with two tasks:
//!
//! - **Encoder Task**: owns the [`EncoderManager`], polls on a 1 ms ticker and
//!   publishes values to [`EncoderValues`]
//! - **Grid Task**: owns the Trellis [`Grid`], scans keys, updates LEDs and
//!   applies encoder-driven display settings
//!
//! Encoder values cross tasks only through the atomics in [`EncoderValues`];
//! an Embassy [`Signal`](embassy_sync::signal::Signal) wakes the grid task
//! when they change.
//!
//! # Modules
//!
//! - [`board`]: grid bring-up and display settings
//! - [`config`]: pins, addresses, timing
//! - [`port`]: RP2040 [`PortAccess`] ([`SioPort`])
//! - [`values`]: cross-task encoder values ([`EncoderValues`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`grid-8x8`** (default): four modules in a 2×2 arrangement
//! - **`grid-4x4`**: a single module
//! - **`grid-16x8`**: eight modules in a 4×2 arrangement
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`untz_core`] for convenience,
//! so consumers only need to depend on this crate.

#![no_std]

// Exactly one grid size
#[cfg(any(
    all(feature = "grid-4x4", feature = "grid-8x8"),
    all(feature = "grid-4x4", feature = "grid-16x8"),
    all(feature = "grid-8x8", feature = "grid-16x8"),
))]
compile_error!("Enable only one of `grid-4x4`, `grid-8x8` and `grid-16x8`");

#[cfg(not(any(feature = "grid-4x4", feature = "grid-8x8", feature = "grid-16x8")))]
compile_error!("Enable one of `grid-4x4`, `grid-8x8` or `grid-16x8`");

// Re-export core types for convenience
pub use untz_core::{
    BlinkRate, Bounds, Encoder, EncoderError, EncoderId, EncoderManager, Grid, GridError,
    GridMapper, MatrixModule, PinState, PortAccess, Trellis,
};

pub mod board;
pub mod config;
pub mod port;
pub mod values;

pub use board::{init_grid, TrellisGrid};
pub use port::{PortError, SioPort};
pub use values::EncoderValues;
