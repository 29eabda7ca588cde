//! Phase-accumulating sine oscillator with audio-rate modulation inputs.
//!
//! Per sample `i`:
//!
//! ```text
//! out[i] = sin(phase + phase_offset[i]) * mul[i] + add[i]
//! phase  = wrap(phase + 2π * freq[i] / sample_rate)
//! ```
//!
//! The order matters: sample `i` uses the phase left by sample `i - 1`, so a
//! block cannot be split across threads or reordered.

use crate::buffer::MonoBuffer;
use crate::dsp::{self, wrap_phase, TWO_PI};
use crate::settings::{AudioSettings, SettingsError};
use crate::signals::Signal;

/// Per-sample modulation streams. Only the first `block_size` samples of each
/// are read.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SineInputs {
    /// Frequency in Hz. Zero holds the phase, negative runs it backwards.
    pub freq: MonoBuffer,
    /// Phase offset in radians, added after accumulation (phase modulation).
    pub phase_offset: MonoBuffer,
    /// Linear gain.
    pub mul: MonoBuffer,
    /// DC offset added after the gain.
    pub add: MonoBuffer,
}

impl SineInputs {
    /// All four streams at `0.0`.
    #[inline]
    pub const fn silent() -> Self {
        Self {
            freq: MonoBuffer::new_silent(),
            phase_offset: MonoBuffer::new_silent(),
            mul: MonoBuffer::new_silent(),
            add: MonoBuffer::new_silent(),
        }
    }
}

impl Default for SineInputs {
    fn default() -> Self {
        Self::silent()
    }
}

/// Sine oscillator.
///
/// Layout (`#[repr(C)]`): settings, inputs, output, phase_accumulator.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct Sine {
    settings: AudioSettings,
    pub inputs: SineInputs,
    output: MonoBuffer,
    phase_accumulator: f32,
}

impl Sine {
    /// New oscillator at phase 0 with all inputs silent, so the first block is
    /// silent until the host writes `mul`.
    ///
    /// # Errors
    /// Rejects settings that fail [`AudioSettings::validate`].
    pub fn new(settings: AudioSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            inputs: SineInputs::silent(),
            output: MonoBuffer::new_silent(),
            phase_accumulator: 0.0,
        })
    }

    /// Current phase in radians, always in `[0, 2π)` for finite inputs.
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase_accumulator
    }

    /// Hard-set the phase (wrapped into `[0, 2π)`).
    #[inline]
    pub fn reset_phase(&mut self, phase: f32) {
        self.phase_accumulator = wrap_phase(phase);
    }

    #[inline]
    pub fn output(&self) -> &MonoBuffer {
        &self.output
    }

    /// The samples written by the last `generate` call.
    #[inline]
    pub fn output_block(&self) -> &[f32] {
        self.output.active(self.settings.block_size())
    }
}

impl Signal for Sine {
    #[inline]
    fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    fn generate(&mut self) {
        let n = self.settings.block_size();
        let rad_per_hz = TWO_PI / self.settings.sample_rate();

        let freq = self.inputs.freq.active(n);
        let phase_offset = self.inputs.phase_offset.active(n);
        let mul = self.inputs.mul.active(n);
        let add = self.inputs.add.active(n);
        let out = self.output.active_mut(n);

        let mut phase = self.phase_accumulator;
        for i in 0..n {
            out[i] = dsp::sin(phase + phase_offset[i]) * mul[i] + add[i];
            phase = wrap_phase(phase + freq[i] * rad_per_hz);
        }
        self.phase_accumulator = phase;
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MAX_BLOCK_SIZE;
    use core::f64::consts::TAU;

    const SR: f32 = 48_000.0;

    fn sine(block_size: usize) -> Sine {
        Sine::new(AudioSettings::new(SR, block_size, 1).unwrap()).unwrap()
    }

    fn set_constant(s: &mut Sine, freq: f32, mul: f32, add: f32) {
        s.inputs.freq.fill(freq);
        s.inputs.phase_offset.fill(0.0);
        s.inputs.mul.fill(mul);
        s.inputs.add.fill(add);
    }

    #[test]
    fn starts_silent_at_phase_zero() {
        let mut s = sine(32);
        assert_eq!(s.phase(), 0.0);
        assert_eq!(s.inputs, SineInputs::silent());
        s.generate();
        assert!(s.output_block().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn constant_frequency_matches_closed_form() {
        let mut s = sine(64);
        set_constant(&mut s, 440.0, 1.0, 0.0);
        // move off phase zero first so the block starts at a non-trivial phi0
        s.generate();

        let phi0 = f64::from(s.phase());
        s.generate();
        for (n, &y) in s.output_block().iter().enumerate() {
            let expected = (TAU * 440.0 * n as f64 / f64::from(SR) + phi0).sin();
            assert!((f64::from(y) - expected).abs() < 1e-3, "n={n} y={y} expected={expected}");
        }

        let expected_phase = (phi0 + TAU * 440.0 * 64.0 / f64::from(SR)).rem_euclid(TAU);
        assert!((f64::from(s.phase()) - expected_phase).abs() < 1e-3);
    }

    #[test]
    fn zero_frequency_holds_phase() {
        let mut s = sine(64);
        s.reset_phase(1.0);
        set_constant(&mut s, 0.0, 0.5, 0.25);
        let before = s.phase();
        s.generate();
        assert_eq!(s.phase(), before);
        let expected = before.sin() * 0.5 + 0.25;
        assert!(s.output_block().iter().all(|&y| (y - expected).abs() < 1e-3));
    }

    #[test]
    fn negative_frequency_runs_backwards_and_wraps() {
        let mut s = sine(64);
        set_constant(&mut s, -1_000.0, 1.0, 0.0);
        s.generate();
        let expected = (-TAU * 1_000.0 * 64.0 / f64::from(SR)).rem_euclid(TAU);
        assert!((f64::from(s.phase()) - expected).abs() < 1e-3, "phase={}", s.phase());
        assert!((0.0..TWO_PI).contains(&s.phase()));
        // first sample is sin(0); the next ones head negative
        assert!(s.output_block()[1] < 0.0);
    }

    #[test]
    fn zero_gain_keeps_phase_continuity() {
        let mut loud = sine(64);
        let mut muted = sine(64);
        set_constant(&mut loud, 220.0, 1.0, 0.0);
        set_constant(&mut muted, 220.0, 0.0, 0.0);
        for _ in 0..10 {
            loud.generate();
            muted.generate();
        }
        assert!(muted.output_block().iter().all(|&y| y == 0.0));
        assert_eq!(loud.phase(), muted.phase());
    }

    #[test]
    fn phase_offset_and_dc_are_per_sample() {
        let mut s = sine(4);
        set_constant(&mut s, 0.0, 1.0, 0.0);
        s.inputs.phase_offset.samples[..4].copy_from_slice(&[0.0, PI_2, 0.0, -PI_2]);
        s.inputs.add.samples[2] = 3.0;
        s.generate();
        let out = s.output_block();
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 1.0).abs() < 1e-3);
        assert!((out[2] - 3.0).abs() < 1e-3);
        assert!((out[3] + 1.0).abs() < 1e-3);
    }

    const PI_2: f32 = core::f32::consts::FRAC_PI_2;

    #[test]
    fn only_the_active_block_is_touched() {
        let mut s = sine(16);
        set_constant(&mut s, 440.0, 1.0, 5.0);
        // poison everything past the block; it must never be read
        for buf in [&mut s.inputs.freq, &mut s.inputs.phase_offset, &mut s.inputs.mul, &mut s.inputs.add] {
            buf.samples[16..].fill(f32::NAN);
        }
        s.generate();
        assert!(s.output_block().iter().all(|y| y.is_finite()));
        assert!(s.output().samples[16..MAX_BLOCK_SIZE].iter().all(|&y| y == 0.0));
        assert!(s.phase().is_finite());
    }

    #[test]
    fn nan_frequency_flows_through() {
        let mut s = sine(8);
        set_constant(&mut s, f32::NAN, 1.0, 0.0);
        s.generate();
        assert!(s.phase().is_nan());
    }

    #[test]
    fn generation_is_repeatable() {
        let mut a = sine(32);
        set_constant(&mut a, 123.0, 0.7, 0.1);
        let mut b = a;
        a.generate();
        b.generate();
        assert_eq!(a.output(), b.output());
        assert_eq!(a.phase(), b.phase());
    }

    mod long_run {
        use super::*;
        use proptest::collection::vec;
        use proptest::{prop_assert, proptest};

        proptest! {
            #[test]
            fn phase_stays_wrapped(freqs in vec(-24_000.0f32..24_000.0, 1..64), blocks in 1usize..200) {
                let mut s = sine(MAX_BLOCK_SIZE);
                s.inputs.mul.fill(1.0);
                for b in 0..blocks {
                    s.inputs.freq.fill(freqs[b % freqs.len()]);
                    s.generate();
                    prop_assert!((0.0..TWO_PI).contains(&s.phase()), "phase={}", s.phase());
                    prop_assert!(s.output_block().iter().all(|y| y.abs() <= 1.0 + 1e-3));
                }
            }
        }
    }
}
