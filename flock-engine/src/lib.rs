//! Flock Engine — host-side glue around the core generators.
//!
//! Crate layout:
//! - [`graph`]   : `Patch` trait and `Engine<P>`, which serves fixed-size
//!                 blocks to callbacks of any length
//! - [`patches`] : ready-made patches that chain generators by copying buffers
//!
//! Generators never call each other; a patch is where the host-side wiring
//! lives. Nothing here allocates after construction.

pub mod graph;
pub mod patches;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use graph::{Engine, Patch};
pub use patches::SineVoice;
