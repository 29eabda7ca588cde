//! Real-time playback through cpal.
//!
//! The device callback pulls interleaved frames from an `Engine`; the engine
//! renders fixed-size generator blocks underneath, whatever size the device
//! asks for. The callback never allocates or logs: it publishes its peak level
//! through an atomic and the main thread reports it once a second.

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use flock_engine::{Engine, SineVoice};

use crate::build_voice;
use crate::cli_args::PlayArgs;

fn list_output_devices() -> Result<(), Box<dyn Error>> {
    let host = cpal::default_host();
    println!("Available output devices:");
    for dev in host.output_devices()? {
        println!("- {}", dev.name()?);
    }
    Ok(())
}

fn pick_device(name: Option<&str>) -> Result<cpal::Device, Box<dyn Error>> {
    let host = cpal::default_host();
    if let Some(name) = name {
        for d in host.output_devices()? {
            if d.name()? == name {
                return Ok(d);
            }
        }
        return Err(format!("requested device not found: {name}").into());
    }
    host.default_output_device().ok_or_else(|| "no default output device".into())
}

/// Pick the device config closest to the requested rate, or the device
/// default when no rate was requested.
fn choose_config(device: &cpal::Device, req_sr: Option<u32>) -> Result<cpal::SupportedStreamConfig, Box<dyn Error>> {
    let Some(sr) = req_sr else {
        return Ok(device.default_output_config()?);
    };

    let mut best: Option<(u32, cpal::SupportedStreamConfigRange)> = None;
    for range in device.supported_output_configs()? {
        let lo = range.min_sample_rate().0;
        let hi = range.max_sample_rate().0;
        let penalty = if (lo..=hi).contains(&sr) { 0 } else { lo.abs_diff(sr).min(hi.abs_diff(sr)) };
        if best.as_ref().map_or(true, |(p, _)| penalty < *p) {
            best = Some((penalty, range));
        }
    }

    let (penalty, range) = best.ok_or("no supported output configs")?;
    if penalty != 0 {
        return Err(format!("device does not support {sr} Hz").into());
    }
    Ok(range.with_sample_rate(cpal::SampleRate(sr)))
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    mut engine: Engine<SineVoice>,
    peak: Arc<AtomicU32>,
) -> Result<cpal::Stream, Box<dyn Error>>
where
    T: cpal::Sample + cpal::FromSample<f32> + cpal::SizedSample + Send + 'static,
{
    let channels = cfg.channels as usize;
    // scratch sized once here; the callback only slices it
    let mut scratch = vec![0.0f32; engine.settings().block_size() * channels];

    let err_fn = |e: cpal::StreamError| log::error!("stream error: {e}");

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _| {
            let mut block_peak = 0.0f32;
            for chunk in output.chunks_mut(scratch.len()) {
                let tmp = &mut scratch[..chunk.len()];
                engine.render_interleaved(tmp, channels);
                for (dst, &s) in chunk.iter_mut().zip(tmp.iter()) {
                    let s = s.clamp(-1.0, 1.0);
                    block_peak = block_peak.max(s.abs());
                    *dst = T::from_sample(s);
                }
            }
            peak.fetch_max(block_peak.to_bits(), Ordering::Relaxed);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

pub fn run_play(args: &PlayArgs) -> Result<(), Box<dyn Error>> {
    if args.list_devices {
        return list_output_devices();
    }

    let device = pick_device(args.device.as_deref())?;
    let req_sr = args.voice.sample_rate.map(|sr| sr.round() as u32);
    let sup_cfg = choose_config(&device, req_sr)?;
    let sample_format = sup_cfg.sample_format();
    let cfg: cpal::StreamConfig = sup_cfg.config();

    let voice = build_voice(&args.voice, cfg.sample_rate.0 as f32)?;
    let engine = Engine::new(voice);

    log::info!("device: {}", device.name()?);
    log::info!("stream config: {cfg:?} (sample_format: {sample_format:?})");
    log::info!(
        "voice: {} Hz, amp {:.2}, {} ch x {} frames/block",
        args.voice.freq,
        args.voice.amp,
        args.voice.channels,
        args.voice.block_size
    );

    // Non-negative f32s order the same as their bit patterns, so fetch_max works.
    let peak = Arc::new(AtomicU32::new(0));
    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, engine, peak.clone())?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, engine, peak.clone())?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, engine, peak.clone())?,
        other => return Err(format!("unsupported device sample format: {other:?}").into()),
    };
    stream.play()?;

    match args.seconds {
        Some(d) => log::info!("auto-stop after {d} seconds"),
        None => log::info!("press Ctrl+C to stop"),
    }

    let started = Instant::now();
    loop {
        std::thread::sleep(Duration::from_secs(1));
        let p = f32::from_bits(peak.swap(0, Ordering::Relaxed));
        log::info!("peak ~ {p:.3}");
        if args.seconds.is_some_and(|d| started.elapsed() >= Duration::from_secs(d)) {
            return Ok(());
        }
    }
}
