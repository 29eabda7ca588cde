#![cfg_attr(not(feature = "std"), no_std)]
//! Flock Core — real-time-safe signal generators on fixed-capacity buffers.
//!
//! Features
//! - `std`      : (default) use the Rust standard library
//! - `no-std`   : build with `#![no_std]` and use `libm`/`micromath` math backends
//! - `fast-math`: polynomial sine in the oscillator instead of the exact backend
//! - `lowmem`   : low-memory profile (64-sample blocks, 2 channels) instead of
//!                the full profile (128-sample blocks, 8 channels)
//!
//! Modules
//! - [`dsp`]      : math backend, phase wrapping, smoothing coefficients
//! - [`buffer`]   : `MonoBuffer` / `MultichannelBuffer` and the capacity constants
//! - [`settings`] : validated `AudioSettings`
//! - [`signals`]  : `Value`, `Sine`, `Fan` generators and the `Signal` trait
//!
//! Design
//! - No heap allocations; every buffer is a fixed-size array sized at build time
//! - Each `generate` call touches only `block_size` samples of `num_channels` channels
//! - All structs are `#[repr(C)]` so the C ABI in `flock-ffi` can pass them by value

pub mod buffer;
pub mod dsp;
pub mod settings;
pub mod signals;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::buffer::{MonoBuffer, MultichannelBuffer, MAX_BLOCK_SIZE, MAX_CHANNEL_COUNT};
    pub use crate::dsp::{one_pole_coeff_ms, wrap_phase, PI, TWO_PI};
    pub use crate::settings::{AudioSettings, SettingsError};
    pub use crate::signals::{
        Fan, FanInputs, Signal, Sine, SineInputs, Value, ValueParameters, VALUE_SMOOTHING_MS,
    };
}
