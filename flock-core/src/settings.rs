//! Per-instance audio configuration.
//!
//! `AudioSettings` can only be built through [`AudioSettings::new`], which
//! rejects anything the fixed-capacity buffers cannot hold. Nothing is ever
//! clamped: a host that asks for 256-sample blocks on a 128-sample build gets
//! an error, not a silently shorter block.

use core::fmt;

use crate::buffer::{MAX_BLOCK_SIZE, MAX_CHANNEL_COUNT};

/// Sample rate, active block size and active channel count.
///
/// Immutable once built. Layout is `#[repr(C)]`:
/// `{ float sample_rate; uintptr_t block_size; uintptr_t num_channels; }`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AudioSettings {
    sample_rate: f32,
    block_size: usize,
    num_channels: usize,
}

/// Why a set of settings was rejected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SettingsError {
    /// Zero, negative or non-finite sample rate.
    InvalidSampleRate(f32),
    /// Block size of zero or larger than the build's `MAX_BLOCK_SIZE`.
    BlockSizeOutOfRange { requested: usize, max: usize },
    /// Channel count of zero or larger than the build's `MAX_CHANNEL_COUNT`.
    ChannelCountOutOfRange { requested: usize, max: usize },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSampleRate(sr) => {
                write!(f, "sample rate must be positive and finite, got {sr}")
            }
            Self::BlockSizeOutOfRange { requested, max } => {
                write!(f, "block size {requested} is outside 1..={max}")
            }
            Self::ChannelCountOutOfRange { requested, max } => {
                write!(f, "channel count {requested} is outside 1..={max}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}

impl AudioSettings {
    /// Validate and build.
    ///
    /// # Errors
    /// Returns a [`SettingsError`] if `sample_rate` is not a positive finite
    /// number, or if `block_size` / `num_channels` is zero or exceeds the
    /// build's buffer capacity.
    pub fn new(sample_rate: f32, block_size: usize, num_channels: usize) -> Result<Self, SettingsError> {
        let settings = Self { sample_rate, block_size, num_channels };
        settings.validate()?;
        Ok(settings)
    }

    /// Re-check the invariants. Settings built through [`AudioSettings::new`]
    /// always pass; this exists for values that crossed the C boundary.
    ///
    /// # Errors
    /// Same conditions as [`AudioSettings::new`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(SettingsError::InvalidSampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(SettingsError::BlockSizeOutOfRange {
                requested: self.block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if self.num_channels == 0 || self.num_channels > MAX_CHANNEL_COUNT {
            return Err(SettingsError::ChannelCountOutOfRange {
                requested: self.num_channels,
                max: MAX_CHANNEL_COUNT,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Length of one block in seconds.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub fn block_duration_secs(&self) -> f32 {
        self.block_size as f32 / self.sample_rate
    }
}

// ------------------------------------ Tests --------------------------------------
