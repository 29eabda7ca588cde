//! Flock CLI — desktop host for the flock generators.
//!
//! - `print`  : print one block per channel (quick sanity check)
//! - `render` : offline render to WAV
//! - `play`   : real-time playback via cpal
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for more detail.

mod cli_args;
mod playback;

use std::error::Error;
use std::path::Path;

use clap::Parser;
use flock_core::settings::AudioSettings;
use flock_engine::{Engine, SineVoice};

use cli_args::{CliArgs, Command, PrintArgs, RenderArgs, VoiceArgs};

/// Default rate for commands that have no device to ask.
const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

/// Build the stock voice from the command line. Invalid settings are
/// reported, never adjusted.
pub(crate) fn build_voice(args: &VoiceArgs, sample_rate: f32) -> Result<SineVoice, Box<dyn Error>> {
    let settings = AudioSettings::new(sample_rate, args.block_size, args.channels)?;
    let mut voice = SineVoice::new(settings, args.freq, args.amp)?;
    voice.set_pm(args.pm_ratio, args.pm_index);
    Ok(voice)
}

fn run_print(args: &PrintArgs) -> Result<(), Box<dyn Error>> {
    let sr = args.voice.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    let mut engine = Engine::new(build_voice(&args.voice, sr)?);

    for _ in 0..args.skip {
        engine.render_block();
    }
    let block_size = engine.settings().block_size();
    let num_channels = engine.settings().num_channels();
    let block = engine.render_block();

    for (c, channel) in block.active_channels(num_channels).iter().enumerate() {
        let samples: Vec<String> = channel.active(block_size).iter().map(|s| format!("{s:.2}")).collect();
        println!("ch{c}: {}", samples.join(","));
    }
    Ok(())
}

fn run_render(args: &RenderArgs) -> Result<(), Box<dyn Error>> {
    let sr = args.voice.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    if !(args.seconds.is_finite() && args.seconds > 0.0) {
        return Err(format!("--seconds must be positive, got {}", args.seconds).into());
    }
    let mut engine = Engine::new(build_voice(&args.voice, sr)?);
    let channels = engine.settings().num_channels();
    let block_size = engine.settings().block_size();

    render_wav(&mut engine, &args.out, args.seconds)?;
    log::info!(
        "wrote {:.2}s ({} ch, {} frames/block) to {}",
        engine.elapsed_secs(),
        channels,
        block_size,
        args.out.display()
    );
    Ok(())
}

/// Render `seconds` of interleaved audio into a float WAV at `path`.
fn render_wav(engine: &mut Engine<SineVoice>, path: &Path, seconds: f32) -> Result<(), Box<dyn Error>> {
    let sr = engine.settings().sample_rate();
    let channels = engine.settings().num_channels();
    let spec = hound::WavSpec {
        channels: u16::try_from(channels)?,
        sample_rate: sr.round() as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;

    let total_frames = (f64::from(seconds) * f64::from(sr)).round() as usize;
    let mut chunk = vec![0.0f32; engine.settings().block_size() * channels];
    let mut remaining = total_frames;
    while remaining > 0 {
        let frames = remaining.min(chunk.len() / channels);
        let written = engine.render_interleaved(&mut chunk[..frames * channels], channels);
        for &s in &chunk[..written * channels] {
            writer.write_sample(s)?;
        }
        remaining -= written;
    }
    writer.finalize()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    match &args.command {
        Command::Print(a) => run_print(a),
        Command::Render(a) => run_render(a),
        Command::Play(a) => playback::run_play(a),
    }
}
