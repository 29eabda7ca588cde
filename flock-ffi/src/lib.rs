//! C ABI for the flock generators.
//!
//! Exposes the generator structs by value, plus constructors, buffer helpers
//! and the three `*_generate` entry points.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Every struct is `#[repr(C)]`; hosts bind by memory layout, so field
//!   order and sizes are part of the ABI (see `include/flock.h`).
//!   `FLOCK_ABI_VERSION` is bumped whenever a layout changes.
//! - Buffer capacity is a build-time profile. The host must compile its
//!   header with the same profile (`LOWMEM` defined or not) as the library;
//!   `flock_max_block_size()` / `flock_max_channel_count()` let it check.
//! - Constructors write through an out-pointer and return a `FlockStatus`;
//!   on any error the out-pointer is left untouched.
//! - No allocation anywhere; every call is bounded by the buffer capacity.
//!
//! Threading
//! - Instances are NOT thread-safe; call `*_generate` for one instance from
//!   one thread (normally the audio callback).

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

use cfg_if::cfg_if;
use flock_core::buffer::{MonoBuffer, MultichannelBuffer, MAX_BLOCK_SIZE, MAX_CHANNEL_COUNT};
use flock_core::settings::{AudioSettings, SettingsError};
use flock_core::signals::{Fan, Signal, Sine, Value};

cfg_if! {
    if #[cfg(all(not(feature = "std"), not(test)))] {
        #[panic_handler]
        fn panic(_panic: &core::panic::PanicInfo) -> ! {
            loop {}
        }
    }
}

/// Bumped whenever a `#[repr(C)]` layout or a signature changes.
pub const FLOCK_ABI_VERSION: u32 = 1;

/// Result of a constructor call.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlockStatus {
    Ok = 0,
    NullPointer = 1,
    InvalidSampleRate = 2,
    BlockSizeOutOfRange = 3,
    ChannelCountOutOfRange = 4,
}

impl From<SettingsError> for FlockStatus {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::InvalidSampleRate(_) => Self::InvalidSampleRate,
            SettingsError::BlockSizeOutOfRange { .. } => Self::BlockSizeOutOfRange,
            SettingsError::ChannelCountOutOfRange { .. } => Self::ChannelCountOutOfRange,
        }
    }
}

/// Write `result` through `out`, or report why not.
#[inline]
fn emit<T>(result: Result<T, SettingsError>, out: *mut T) -> FlockStatus {
    if out.is_null() {
        return FlockStatus::NullPointer;
    }
    match result {
        Ok(v) => {
            // `out` may point at uninitialised host memory, so no drop of the old value.
            unsafe { out.write(v) };
            FlockStatus::Ok
        }
        Err(e) => e.into(),
    }
}

/// Run `generate` only when the embedded settings still hold. A C host can
/// scribble over any field, and an out-of-range block size must not turn
/// into an out-of-bounds write.
#[inline]
fn generate_checked<S: Signal>(signal: *mut S) {
    let Some(s) = (unsafe { signal.as_mut() }) else { return };
    if s.settings().validate().is_ok() {
        s.generate();
    }
}

// --- Build profile ----------------------------------------------------------------

#[no_mangle]
pub extern "C" fn flock_abi_version() -> u32 {
    FLOCK_ABI_VERSION
}

#[no_mangle]
pub extern "C" fn flock_max_block_size() -> usize {
    MAX_BLOCK_SIZE
}

#[no_mangle]
pub extern "C" fn flock_max_channel_count() -> usize {
    MAX_CHANNEL_COUNT
}

// --- Buffers ------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn MonoBuffer_new_with_value(value: f32) -> MonoBuffer {
    MonoBuffer::new_with_value(value)
}

#[no_mangle]
pub extern "C" fn MonoBuffer_new_silent() -> MonoBuffer {
    MonoBuffer::new_silent()
}

#[no_mangle]
pub extern "C" fn MultichannelBuffer_new_with_value(value: f32) -> MultichannelBuffer {
    MultichannelBuffer::new_with_value(value)
}

#[no_mangle]
pub extern "C" fn MultichannelBuffer_new_silent() -> MultichannelBuffer {
    MultichannelBuffer::new_silent()
}

// --- Settings -------------------------------------------------------------------------

/// Validate and build settings into `*out`.
#[no_mangle]
pub extern "C" fn AudioSettings_new(
    sample_rate: f32,
    block_size: usize,
    num_channels: usize,
    out: *mut AudioSettings,
) -> FlockStatus {
    emit(AudioSettings::new(sample_rate, block_size, num_channels), out)
}

/// Check settings a host assembled by hand.
#[no_mangle]
pub extern "C" fn AudioSettings_validate(settings: AudioSettings) -> FlockStatus {
    match settings.validate() {
        Ok(()) => FlockStatus::Ok,
        Err(e) => e.into(),
    }
}

// --- Value --------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn Value_new(settings: AudioSettings, out: *mut Value) -> FlockStatus {
    emit(Value::new(settings), out)
}

#[no_mangle]
pub extern "C" fn Value_generate(value: *mut Value) {
    generate_checked(value);
}

// --- Sine ---------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn Sine_new(settings: AudioSettings, out: *mut Sine) -> FlockStatus {
    emit(Sine::new(settings), out)
}

#[no_mangle]
pub extern "C" fn Sine_generate(sine: *mut Sine) {
    generate_checked(sine);
}

// --- Fan ----------------------------------------------------------------------------

#[no_mangle]
pub extern "C" fn Fan_new(settings: AudioSettings, out: *mut Fan) -> FlockStatus {
    emit(Fan::new(settings), out)
}

#[no_mangle]
pub extern "C" fn Fan_generate(fan: *mut Fan) {
    generate_checked(fan);
}

// ------------------------------------ Tests --------------------------------------
