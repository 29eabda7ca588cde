//! Block-based signal generators.
//!
//! Every generator follows the same shape: it owns its `AudioSettings`, its
//! input buffers and its output buffer, plus at most one scalar of persistent
//! state. The host writes inputs, calls [`Signal::generate`], then reads the
//! output. Generators never call each other; chaining is done by the host
//! copying one generator's output into another's input.
//!
//! - [`Value`] : constant, smoothed towards a target
//! - [`Sine`]  : phase-accumulating sine with per-sample FM/PM/AM/DC inputs
//! - [`Fan`]   : mono source copied to every active output channel

mod fan;
mod sine;
mod value;

pub use fan::{Fan, FanInputs};
pub use sine::{Sine, SineInputs};
pub use value::{Value, ValueParameters, VALUE_SMOOTHING_MS};

use crate::settings::AudioSettings;

/// Anything that renders one block at a time.
pub trait Signal {
    /// The settings this instance was built with.
    fn settings(&self) -> &AudioSettings;

    /// Render exactly `block_size` samples per active channel into the
    /// output buffer, advancing any persistent state.
    fn generate(&mut self);
}
