//! Fixed-capacity sample buffers.
//!
//! Capacity is a build-time choice, never a runtime field:
//!
//! | profile              | `MAX_BLOCK_SIZE` | `MAX_CHANNEL_COUNT` |
//! |----------------------|------------------|---------------------|
//! | full (default)       | 128              | 8                   |
//! | low-memory (`lowmem`)| 64               | 2                   |
//!
//! Buffers are always fully initialised, including the capacity past the
//! active block, so they can be copied or compared wholesale. Generators only
//! ever address the first `block_size` samples of the first `num_channels`
//! channels.
//!
//! Layout (`#[repr(C)]`): a `MonoBuffer` is `float samples[MAX_BLOCK_SIZE]`
//! and a `MultichannelBuffer` is `float channels[MAX_CHANNEL_COUNT][MAX_BLOCK_SIZE]`.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "lowmem")] {
        /// Samples per buffer (low-memory profile).
        pub const MAX_BLOCK_SIZE: usize = 64;
        /// Channels per multichannel buffer (low-memory profile).
        pub const MAX_CHANNEL_COUNT: usize = 2;
    } else {
        /// Samples per buffer (full profile).
        pub const MAX_BLOCK_SIZE: usize = 128;
        /// Channels per multichannel buffer (full profile).
        pub const MAX_CHANNEL_COUNT: usize = 8;
    }
}

/// One channel of samples.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MonoBuffer {
    pub samples: [f32; MAX_BLOCK_SIZE],
}

impl MonoBuffer {
    /// Buffer with every sample of the full capacity set to `value`.
    #[inline]
    pub const fn new_with_value(value: f32) -> Self {
        Self { samples: [value; MAX_BLOCK_SIZE] }
    }

    /// Buffer of `0.0` across the full capacity.
    #[inline]
    pub const fn new_silent() -> Self {
        Self::new_with_value(0.0)
    }

    /// The first `block_size` samples.
    ///
    /// Panics if `block_size > MAX_BLOCK_SIZE`; validated settings never do.
    #[inline]
    pub fn active(&self, block_size: usize) -> &[f32] {
        &self.samples[..block_size]
    }

    #[inline]
    pub fn active_mut(&mut self, block_size: usize) -> &mut [f32] {
        &mut self.samples[..block_size]
    }

    /// Overwrite the whole capacity with `value`.
    #[inline]
    pub fn fill(&mut self, value: f32) {
        self.samples.fill(value);
    }
}

impl Default for MonoBuffer {
    fn default() -> Self {
        Self::new_silent()
    }
}

/// `MAX_CHANNEL_COUNT` mono buffers side by side.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MultichannelBuffer {
    pub channels: [MonoBuffer; MAX_CHANNEL_COUNT],
}

impl MultichannelBuffer {
    #[inline]
    pub const fn new_with_value(value: f32) -> Self {
        Self { channels: [MonoBuffer::new_with_value(value); MAX_CHANNEL_COUNT] }
    }

    #[inline]
    pub const fn new_silent() -> Self {
        Self::new_with_value(0.0)
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> &MonoBuffer {
        &self.channels[channel]
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> &mut MonoBuffer {
        &mut self.channels[channel]
    }

    /// The first `num_channels` channels.
    #[inline]
    pub fn active_channels(&self, num_channels: usize) -> &[MonoBuffer] {
        &self.channels[..num_channels]
    }

    #[inline]
    pub fn active_channels_mut(&mut self, num_channels: usize) -> &mut [MonoBuffer] {
        &mut self.channels[..num_channels]
    }

    /// Overwrite every channel's whole capacity with `value`.
    #[inline]
    pub fn fill(&mut self, value: f32) {
        for channel in &mut self.channels {
            channel.fill(value);
        }
    }
}

impl Default for MultichannelBuffer {
    fn default() -> Self {
        Self::new_silent()
    }
}

// ------------------------------------ Tests --------------------------------------
