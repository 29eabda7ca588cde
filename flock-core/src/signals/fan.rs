//! Mono to multichannel fan-out.

use crate::buffer::{MonoBuffer, MultichannelBuffer};
use crate::settings::{AudioSettings, SettingsError};
use crate::signals::Signal;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FanInputs {
    pub source: MonoBuffer,
}

/// Copies `inputs.source` into each of the first `num_channels` output
/// channels. No gain, no mixing, no state.
///
/// Layout (`#[repr(C)]`): settings, inputs, output.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct Fan {
    settings: AudioSettings,
    pub inputs: FanInputs,
    output: MultichannelBuffer,
}

impl Fan {
    /// # Errors
    /// Rejects settings that fail [`AudioSettings::validate`].
    pub fn new(settings: AudioSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            inputs: FanInputs { source: MonoBuffer::new_silent() },
            output: MultichannelBuffer::new_silent(),
        })
    }

    #[inline]
    pub fn output(&self) -> &MultichannelBuffer {
        &self.output
    }
}

impl Signal for Fan {
    #[inline]
    fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    fn generate(&mut self) {
        let n = self.settings.block_size();
        let source = self.inputs.source.active(n);
        for channel in self.output.active_channels_mut(self.settings.num_channels()) {
            channel.active_mut(n).copy_from_slice(source);
        }
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{MAX_BLOCK_SIZE, MAX_CHANNEL_COUNT};

    fn ramp_source(fan: &mut Fan) {
        for (i, s) in fan.inputs.source.samples.iter_mut().enumerate() {
            *s = i as f32 * 0.01 - 0.3;
        }
    }

    #[test]
    fn copies_source_bit_for_bit_for_every_channel_count() {
        for num_channels in 1..=MAX_CHANNEL_COUNT {
            let settings = AudioSettings::new(48_000.0, MAX_BLOCK_SIZE, num_channels).unwrap();
            let mut fan = Fan::new(settings).unwrap();
            ramp_source(&mut fan);
            fan.inputs.source.samples[3] = f32::from_bits(0x7fc0_0001); // NaN payload survives
            fan.generate();

            for channel in fan.output().active_channels(num_channels) {
                let got = channel.samples.map(f32::to_bits);
                let want = fan.inputs.source.samples.map(f32::to_bits);
                assert_eq!(got, want, "num_channels={num_channels}");
            }
            for channel in &fan.output().channels[num_channels..] {
                assert_eq!(*channel, MonoBuffer::new_silent());
            }
        }
    }

    #[test]
    fn respects_block_size() {
        let settings = AudioSettings::new(48_000.0, 10, 1).unwrap();
        let mut fan = Fan::new(settings).unwrap();
        fan.inputs.source.fill(1.0);
        fan.generate();
        let ch = fan.output().channel(0);
        assert!(ch.samples[..10].iter().all(|&s| s == 1.0));
        assert!(ch.samples[10..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn is_stateless() {
        let settings = AudioSettings::new(48_000.0, 16, 1).unwrap();
        let mut fan = Fan::new(settings).unwrap();
        fan.inputs.source.fill(0.5);
        fan.generate();
        fan.inputs.source.fill(-0.5);
        fan.generate();
        assert!(fan.output().channel(0).active(16).iter().all(|&s| s == -0.5));
    }
}
