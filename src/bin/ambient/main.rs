//! ambient - play soundscape presets on the default output device
//!
//! ```text
//! cargo run --bin ambient -- --list
//! cargo run --bin ambient -- rain_v1
//! cargo run --bin ambient -- --seconds 20 pink_noise_v1 ocean_waves_v1
//! ```
//!
//! With several presets, each plays for `--seconds` and crossfades into the
//! next; the last one fades out and the program exits. With a single preset
//! and no `--seconds`, it plays until Ctrl+C. Set `RUST_LOG=debug` to watch
//! the engine's lifecycle.

use std::time::{Duration, Instant};

use ambient_dsp::{presets, AmbientEngine, EngineConfig, EngineController, PlaybackState};
use color_eyre::eyre::{bail, eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

struct Args {
    list: bool,
    seconds: Option<f32>,
    presets: Vec<String>,
}

fn parse_args() -> EyreResult<Args> {
    let mut args = Args {
        list: false,
        seconds: None,
        presets: Vec::new(),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--list" | "-l" => args.list = true,
            "--seconds" | "-s" => {
                let value = iter.next().ok_or_else(|| eyre!("--seconds needs a value"))?;
                let seconds: f32 = value
                    .parse()
                    .wrap_err_with(|| format!("invalid --seconds value '{value}'"))?;
                if !seconds.is_finite() || seconds <= 0.0 {
                    bail!("--seconds must be positive");
                }
                args.seconds = Some(seconds);
            }
            other if other.starts_with('-') => bail!("unknown option '{other}'"),
            id => args.presets.push(id.to_string()),
        }
    }
    Ok(args)
}

fn print_catalog() {
    println!("{:<26} {:<22} LAYERS", "ID", "TITLE");
    for preset in presets::catalog() {
        let layers: Vec<&str> = preset.layers.iter().map(|layer| layer.name).collect();
        println!("{:<26} {:<22} {}", preset.id, preset.title, layers.join(", "));
    }
}

/// Poll the controller until `deadline`.
fn wait_until(control: &mut EngineController, deadline: Instant) {
    loop {
        control.poll();
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;
    if args.list || args.presets.is_empty() {
        print_catalog();
        return Ok(());
    }
    // Fail on a typo before touching the audio device.
    for id in &args.presets {
        presets::find(id)?;
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    info!("Output: {} Hz, {} channel(s)", sample_rate, channels);

    let (mut control, mut render) = AmbientEngine::new(EngineConfig::new(sample_rate, 1_024))?;

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| render.render_interleaved(data, channels),
        |err| eprintln!("Audio error: {}", err),
        None,
    )?;
    stream.play()?;

    let (first, rest) = args
        .presets
        .split_first()
        .ok_or_else(|| eyre!("no preset given"))?;
    control.load_preset(first)?;
    control.start()?;

    let Some(seconds) = args.seconds else {
        println!("Playing {first}... Press Ctrl+C to stop");
        loop {
            wait_until(&mut control, Instant::now() + Duration::from_secs(1));
        }
    };
    let hold = Duration::from_secs_f32(seconds);

    wait_until(&mut control, Instant::now() + hold);
    for id in rest {
        control.load_preset(id)?;
        wait_until(&mut control, Instant::now() + hold);
    }

    control.stop()?;
    while control.state() != PlaybackState::Stopped {
        wait_until(&mut control, Instant::now() + POLL_INTERVAL);
    }
    // Let the renderer take the halt before the stream goes away.
    wait_until(&mut control, Instant::now() + Duration::from_millis(200));
    Ok(())
}
