//! Patches: generators wired together by copying buffers between calls.
//!
//! `SineVoice` is the stock voice used by the CLI:
//!
//! ```text
//! freq (Value) ──┬──────────────► carrier.freq
//!                └─ × ratio ────► modulator.freq
//! pm_index (Value) ─────────────► modulator.mul
//! modulator.out ────────────────► carrier.phase_offset
//! amp (Value) ──────────────────► carrier.mul
//! carrier.out ──────────────────► fan.source ──► output (all channels)
//! ```
//!
//! With `pm_index = 0` the modulator is silent and the voice is a plain sine.

use flock_core::buffer::MultichannelBuffer;
use flock_core::settings::{AudioSettings, SettingsError};
use flock_core::signals::{Fan, Signal, Sine, Value};

use crate::graph::Patch;

/// Phase-modulated sine voice fanned out to every active channel.
#[derive(Copy, Clone, Debug)]
pub struct SineVoice {
    settings: AudioSettings,
    // controls
    freq: Value,
    amp: Value,
    pm_index: Value,
    pm_ratio: f32,
    // signal path
    modulator: Sine,
    carrier: Sine,
    fan: Fan,
}

impl SineVoice {
    /// Build a voice at `freq_hz`. The amplitude glides up from silence to
    /// `amp` so the first block does not click.
    ///
    /// # Errors
    /// Rejects settings that fail [`AudioSettings::validate`].
    pub fn new(settings: AudioSettings, freq_hz: f32, amp: f32) -> Result<Self, SettingsError> {
        let mut freq = Value::new(settings)?;
        freq.reset(freq_hz);
        let amp = Value::with_value(settings, amp)?;

        log::debug!("sine voice: {freq_hz} Hz, amp {}", amp.parameters.value);

        Ok(Self {
            settings,
            freq,
            amp,
            pm_index: Value::new(settings)?,
            pm_ratio: 1.0,
            modulator: Sine::new(settings)?,
            carrier: Sine::new(settings)?,
            fan: Fan::new(settings)?,
        })
    }

    /// Target frequency in Hz (smoothed).
    #[inline] pub fn set_freq(&mut self, hz: f32) { self.freq.set_value(hz); }

    /// Target linear amplitude (smoothed).
    #[inline] pub fn set_amp(&mut self, amp: f32) { self.amp.set_value(amp); }

    /// Phase modulation: modulator runs at `ratio × freq`, with a peak phase
    /// deviation of `index` radians (smoothed). `index = 0` disables it.
    #[inline]
    pub fn set_pm(&mut self, ratio: f32, index: f32) {
        self.pm_ratio = ratio;
        self.pm_index.set_value(index);
    }

    #[inline] pub fn freq(&self) -> f32 { self.freq.parameters.value }
    #[inline] pub fn amp(&self) -> f32 { self.amp.parameters.value }

    /// The carrier's mono output for the last block.
    #[inline]
    pub fn mono_block(&self) -> &[f32] {
        self.carrier.output_block()
    }
}

impl Patch for SineVoice {
    #[inline]
    fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    fn process(&mut self) {
        let n = self.settings.block_size();

        self.freq.generate();
        self.amp.generate();
        self.pm_index.generate();

        let ratio = self.pm_ratio;
        for (m, &f) in self.modulator.inputs.freq.active_mut(n).iter_mut().zip(self.freq.output_block()) {
            *m = f * ratio;
        }
        self.modulator.inputs.mul.active_mut(n).copy_from_slice(self.pm_index.output_block());
        self.modulator.generate();

        let carrier = &mut self.carrier.inputs;
        carrier.freq.active_mut(n).copy_from_slice(self.freq.output_block());
        carrier.phase_offset.active_mut(n).copy_from_slice(self.modulator.output_block());
        carrier.mul.active_mut(n).copy_from_slice(self.amp.output_block());
        self.carrier.generate();

        self.fan.inputs.source.active_mut(n).copy_from_slice(self.carrier.output_block());
        self.fan.generate();
    }

    #[inline]
    fn output(&self) -> &MultichannelBuffer {
        self.fan.output()
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(num_channels: usize) -> AudioSettings {
        AudioSettings::new(48_000.0, 64, num_channels).unwrap()
    }

    #[test]
    fn plain_voice_matches_a_bare_sine() {
        let mut voice = SineVoice::new(settings(1), 440.0, 1.0).unwrap();
        // skip the amplitude glide
        voice.amp.reset(1.0);

        let mut reference = Sine::new(settings(1)).unwrap();
        reference.inputs.freq.fill(440.0);
        reference.inputs.mul.fill(1.0);

        for _ in 0..8 {
            voice.process();
            reference.generate();
            for (a, b) in voice.mono_block().iter().zip(reference.output_block()) {
                assert!((a - b).abs() < 1e-6, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn every_channel_carries_the_voice() {
        let mut voice = SineVoice::new(settings(2), 220.0, 0.5).unwrap();
        voice.process();
        let out = voice.output();
        assert_eq!(out.channel(0).active(64), voice.mono_block());
        assert_eq!(out.channel(1).active(64), voice.mono_block());
    }

    #[test]
    fn amplitude_fades_in() {
        let mut voice = SineVoice::new(settings(1), 220.0, 1.0).unwrap();
        voice.process();
        let early = voice.mono_block().iter().fold(0.0f32, |m, s| m.max(s.abs()));
        for _ in 0..100 {
            voice.process();
        }
        // a 64-sample block is under a third of a 220 Hz cycle; look at a full one
        let mut late = 0.0f32;
        for _ in 0..4 {
            voice.process();
            late = voice.mono_block().iter().fold(late, |m, s| m.max(s.abs()));
        }
        assert!(early < 0.3, "early={early}");
        assert!(late > 0.9 && late <= 1.0 + 1e-3, "late={late}");
    }

    #[test]
    fn phase_modulation_changes_the_waveform() {
        let mut plain = SineVoice::new(settings(1), 220.0, 1.0).unwrap();
        let mut pm = plain;
        pm.set_pm(2.0, 3.0);
        let mut max_diff = 0.0f32;
        for _ in 0..50 {
            plain.process();
            pm.process();
            for (a, b) in plain.mono_block().iter().zip(pm.mono_block()) {
                max_diff = max_diff.max((a - b).abs());
            }
        }
        assert!(max_diff > 0.1, "max_diff={max_diff}");
        // PM does not change the amplitude envelope
        assert!(pm.mono_block().iter().all(|s| s.abs() <= 1.0 + 1e-3));
    }

    #[test]
    fn setters_update_targets() {
        let mut voice = SineVoice::new(settings(1), 110.0, 0.2).unwrap();
        voice.set_freq(330.0);
        voice.set_amp(0.8);
        assert_eq!(voice.freq(), 330.0);
        assert_eq!(voice.amp(), 0.8);
    }
}
