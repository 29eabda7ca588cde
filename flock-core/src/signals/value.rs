//! Smoothed constant source.

use crate::buffer::MonoBuffer;
use crate::dsp::one_pole_coeff_ms;
use crate::settings::{AudioSettings, SettingsError};
use crate::signals::Signal;

/// Time constant of the target smoothing, in milliseconds.
///
/// After one time constant the output has covered ~63% of a step; after five
/// it is within 1%. The per-sample coefficient is derived from the sample
/// rate, so the glide takes the same wall-clock time at any rate.
pub const VALUE_SMOOTHING_MS: f32 = 5.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ValueParameters {
    /// Target the output glides towards.
    pub value: f32,
}

/// Emits `parameters.value` with a one-pole glide on changes.
///
/// Layout (`#[repr(C)]`): settings, parameters, output, last_sample.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct Value {
    settings: AudioSettings,
    pub parameters: ValueParameters,
    output: MonoBuffer,
    last_sample: f32,
}

impl Value {
    /// New generator with target `0.0` and a silent output.
    ///
    /// # Errors
    /// Rejects settings that fail [`AudioSettings::validate`].
    pub fn new(settings: AudioSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            parameters: ValueParameters { value: 0.0 },
            output: MonoBuffer::new_silent(),
            last_sample: 0.0,
        })
    }

    /// New generator targeting `value`. The output still starts from `0.0`
    /// and glides up; call [`Value::reset`] to start on the target.
    ///
    /// # Errors
    /// Rejects settings that fail [`AudioSettings::validate`].
    pub fn with_value(settings: AudioSettings, value: f32) -> Result<Self, SettingsError> {
        let mut v = Self::new(settings)?;
        v.parameters.value = value;
        Ok(v)
    }

    #[inline]
    pub fn set_value(&mut self, value: f32) {
        self.parameters.value = value;
    }

    /// Jump straight to `value`, skipping the glide.
    #[inline]
    pub fn reset(&mut self, value: f32) {
        self.parameters.value = value;
        self.last_sample = value;
    }

    #[inline]
    pub fn last_sample(&self) -> f32 {
        self.last_sample
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

impl Signal for Value {
    #[inline]
    fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    fn generate(&mut self) {
        let a = one_pole_coeff_ms(VALUE_SMOOTHING_MS, self.settings.sample_rate());
        let step = 1.0 - a;
        let target = self.parameters.value;

        let mut y = self.last_sample;
        for out in self.output.active_mut(self.settings.block_size()) {
            y += (target - y) * step;
            *out = y;
        }
        self.last_sample = y;
    }
}

// ------------------------------------ Tests --------------------------------------
