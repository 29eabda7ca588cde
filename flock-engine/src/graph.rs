//! Block-to-frame adapter.
//!
//! Audio callbacks rarely ask for exactly one generator block. `Engine<P>`
//! owns a patch and a read cursor into its last rendered block, and pulls a
//! new block whenever the cursor runs out, so the host can ask for any number
//! of frames.
//!
//! Design goals
//! - No dynamic allocations in the audio thread
//! - Generic over the patch type, so patches can be swapped without trait objects

use flock_core::buffer::MultichannelBuffer;
use flock_core::settings::AudioSettings;

/// A host-side chain of generators that renders one block per call.
pub trait Patch {
    fn settings(&self) -> &AudioSettings;

    /// Render the next block into the buffer returned by [`Patch::output`].
    fn process(&mut self);

    /// The last rendered block. Valid for `block_size` samples of
    /// `num_channels` channels.
    fn output(&self) -> &MultichannelBuffer;
}

/// Owns a patch and serves its blocks frame by frame.
pub struct Engine<P: Patch> {
    patch: P,
    /// Next frame of the current block to hand out; `block_size` when exhausted.
    cursor: usize,
    frames_rendered: u64,
}

impl<P: Patch> Engine<P> {
    /// Wrap a patch. Nothing is rendered until the first request.
    pub fn new(patch: P) -> Self {
        let settings = *patch.settings();
        log::debug!(
            "engine: {} Hz, {} frames/block, {} channels",
            settings.sample_rate(),
            settings.block_size(),
            settings.num_channels()
        );
        Self { patch, cursor: settings.block_size(), frames_rendered: 0 }
    }

    /// Fill `out` with interleaved frames of `channels` samples each.
    ///
    /// Output channel `c` carries patch channel `c % num_channels`, so a
    /// stereo device fed by a mono patch gets the same signal on both sides.
    /// A trailing partial frame in `out` is left untouched.
    ///
    /// Returns the number of frames written.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) -> usize {
        if channels == 0 {
            return 0;
        }
        let block_size = self.patch.settings().block_size();
        let num_channels = self.patch.settings().num_channels();

        let mut frames = 0;
        for frame in out.chunks_exact_mut(channels) {
            if self.cursor >= block_size {
                self.patch.process();
                self.cursor = 0;
            }
            let block = self.patch.output();
            for (c, sample) in frame.iter_mut().enumerate() {
                *sample = block.channels[c % num_channels].samples[self.cursor];
            }
            self.cursor += 1;
            frames += 1;
        }
        self.frames_rendered += frames as u64;
        frames
    }

    /// Render exactly one block and return it.
    ///
    /// Any frames of the previous block not yet handed out by
    /// [`Engine::render_interleaved`] are dropped.
    pub fn render_block(&mut self) -> &MultichannelBuffer {
        let block_size = self.patch.settings().block_size();
        self.patch.process();
        self.cursor = block_size;
        self.frames_rendered += block_size as u64;
        self.patch.output()
    }

    #[inline]
    pub fn settings(&self) -> &AudioSettings {
        self.patch.settings()
    }

    /// Seconds of audio rendered so far.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub fn elapsed_secs(&self) -> f64 {
        self.frames_rendered as f64 / f64::from(self.patch.settings().sample_rate())
    }

    /// Get a mutable reference to the patch for live parameter tweaks.
    #[inline]
    pub fn patch_mut(&mut self) -> &mut P {
        &mut self.patch
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes a running frame counter, offset by 1000 per channel.
    struct Counter {
        settings: AudioSettings,
        next: f32,
        out: MultichannelBuffer,
    }

    impl Counter {
        fn new(block_size: usize, num_channels: usize) -> Self {
            Self {
                settings: AudioSettings::new(1_000.0, block_size, num_channels).unwrap(),
                next: 0.0,
                out: MultichannelBuffer::new_silent(),
            }
        }
    }

    impl Patch for Counter {
        fn settings(&self) -> &AudioSettings {
            &self.settings
        }

        fn process(&mut self) {
            let n = self.settings.block_size();
            for i in 0..n {
                for (c, ch) in self.out.active_channels_mut(self.settings.num_channels()).iter_mut().enumerate() {
                    ch.samples[i] = self.next + 1000.0 * c as f32;
                }
                self.next += 1.0;
            }
        }

        fn output(&self) -> &MultichannelBuffer {
            &self.out
        }
    }

    #[test]
    fn frames_run_across_block_boundaries() {
        let mut engine = Engine::new(Counter::new(4, 1));
        let mut out = [0.0f32; 10];
        assert_eq!(engine.render_interleaved(&mut out, 1), 10);
        assert_eq!(out, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

        // the next call resumes mid-block
        let mut out = [0.0f32; 3];
        engine.render_interleaved(&mut out, 1);
        assert_eq!(out, [10.0, 11.0, 12.0]);
        assert!((engine.elapsed_secs() - 0.013).abs() < 1e-9);
    }

    #[test]
    fn extra_device_channels_wrap_around() {
        let mut engine = Engine::new(Counter::new(4, 2));
        let mut out = [0.0f32; 8];
        assert_eq!(engine.render_interleaved(&mut out, 4), 2);
        assert_eq!(out, [0.0, 1000.0, 0.0, 1000.0, 1.0, 1001.0, 1.0, 1001.0]);
    }

    #[test]
    fn partial_trailing_frame_is_untouched() {
        let mut engine = Engine::new(Counter::new(4, 1));
        let mut out = [-1.0f32; 5];
        assert_eq!(engine.render_interleaved(&mut out, 2), 2);
        assert_eq!(out[4], -1.0);
        assert_eq!(engine.render_interleaved(&mut out, 0), 0);
    }

    #[test]
    fn render_block_drops_the_unread_tail() {
        let mut engine = Engine::new(Counter::new(4, 1));
        let mut out = [0.0f32; 1];
        engine.render_interleaved(&mut out, 1);
        let block = engine.render_block();
        assert_eq!(block.channel(0).active(4), &[4.0, 5.0, 6.0, 7.0]);
        engine.render_interleaved(&mut out, 1);
        assert_eq!(out[0], 8.0);
    }
}
