//! Definition of the Clap command line.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flock_core::buffer::MAX_BLOCK_SIZE;

#[derive(Debug, Parser)]
#[command(name = "flock", version, about = "Drive the flock generators from the desktop")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one block of samples per channel.
    Print(PrintArgs),

    /// Render to a 32-bit float WAV file.
    Render(RenderArgs),

    /// Play through an audio device.
    Play(PlayArgs),
}

/// Settings and voice parameters shared by every command.
///
/// Settings are passed to the generators as given; values the build's
/// buffers cannot hold are reported as errors.
#[derive(Debug, Parser)]
pub struct VoiceArgs {
    /// Sample rate in Hz. `play` uses the device's rate unless this is set.
    #[arg(long)]
    pub sample_rate: Option<f32>,

    /// Samples per generator block.
    #[arg(long, default_value_t = MAX_BLOCK_SIZE)]
    pub block_size: usize,

    /// Channels the voice is fanned out to.
    #[arg(long, default_value_t = 2)]
    pub channels: usize,

    /// Oscillator frequency in Hz (negative runs the phase backwards; use `--freq=-110`).
    #[arg(long, default_value_t = 220.0)]
    pub freq: f32,

    /// Linear output amplitude.
    #[arg(long, default_value_t = 0.35)]
    pub amp: f32,

    /// Phase-modulator frequency as a multiple of `--freq`.
    #[arg(long, default_value_t = 1.0)]
    pub pm_ratio: f32,

    /// Peak phase deviation in radians; 0 gives a plain sine.
    #[arg(long, default_value_t = 0.0)]
    pub pm_index: f32,
}

#[derive(Debug, Parser)]
pub struct PrintArgs {
    #[command(flatten)]
    pub voice: VoiceArgs,

    /// Blocks to render before printing (skips the fade-in).
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
}

#[derive(Debug, Parser)]
pub struct RenderArgs {
    #[command(flatten)]
    pub voice: VoiceArgs,

    /// Output WAV path.
    #[arg(long)]
    pub out: PathBuf,

    /// Length in seconds.
    #[arg(long, default_value_t = 5.0)]
    pub seconds: f32,
}

#[derive(Debug, Parser)]
pub struct PlayArgs {
    #[command(flatten)]
    pub voice: VoiceArgs,

    /// List output devices and exit.
    #[arg(long)]
    pub list_devices: bool,

    /// Output device name; defaults to the host's default device.
    #[arg(long)]
    pub device: Option<String>,

    /// Stop after this many seconds; plays until Ctrl+C otherwise.
    #[arg(long)]
    pub seconds: Option<u64>,
}
