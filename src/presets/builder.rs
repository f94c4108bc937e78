use crate::{
    dsp::{lfo::LfoRange, limiter::SoftLimiter, reverb::SchroederReverb},
    engine::mixer::FinalMixer,
    error::ConfigError,
    graph::{
        amplify::{Clamp, Constant},
        chime::ChimeNode,
        extensions::{ProcessorExt, SignalExt},
        filter::{FilterNode, FilterParam},
        lfo::LfoNode,
        melody::MelodyNode,
        node::{Processor, Signal},
        noise::NoiseNode,
        oscillator::OscNode,
        partials::PartialsNode,
    },
};

use super::{AmplitudeSpec, FilterSpec, LayerDef, LfoSpec, Preset, SourceSpec};

/// Build a fresh, muted mixer for `preset`.
///
/// Every call constructs new nodes with their seeds and phases at zero, so
/// two mixers built from the same preset render identical samples and share
/// no state with each other or with anything built before.
///
/// This allocates. Call it on the control thread, never from the audio
/// callback.
pub fn build(
    preset: &Preset,
    sample_rate: f32,
    max_frames: usize,
) -> Result<FinalMixer, ConfigError> {
    let mut mixer = FinalMixer::new(sample_rate, max_frames)?;

    for layer in preset.layers {
        let (signal, level) = build_layer(layer, sample_rate)?;
        mixer.add_layer(signal, layer.gain * level)?;
    }

    if let Some(spec) = &preset.filter {
        mixer.set_filter(build_filter(spec, sample_rate)?);
    }
    if let Some(params) = preset.reverb {
        mixer.set_reverb(SchroederReverb::new(params, sample_rate)?);
    }
    mixer.set_limiter(SoftLimiter::new(preset.limiter)?);

    Ok(mixer)
}

/// Source, then each filter in order, then the amplitude shape. A constant
/// amplitude is returned as a level to fold into the layer gain.
fn build_layer(layer: &LayerDef, sample_rate: f32) -> Result<(Box<dyn Signal>, f32), ConfigError> {
    let mut signal = build_source(&layer.source)?;
    for spec in layer.filters {
        signal = signal.through(build_filter(spec, sample_rate)?).boxed();
    }

    Ok(match &layer.amplitude {
        AmplitudeSpec::Constant(level) => (signal, *level),
        AmplitudeSpec::Lfo(lfo) => (signal.amplify(build_lfo(lfo)?).boxed(), 1.0),
        AmplitudeSpec::Swell { base, lfos } => (signal.amplify(build_swell(*base, lfos)?).boxed(), 1.0),
    })
}

/// `base + Σ lfo`, clamped to `[0, 1]`.
fn build_swell(base: f32, lfos: &[LfoSpec]) -> Result<Box<dyn Signal>, ConfigError> {
    let mut swell = Constant(base).boxed();
    for lfo in lfos {
        swell = swell.sum(build_lfo(lfo)?).boxed();
    }
    Ok(swell.through(Clamp::UNIT).boxed())
}

fn build_source(source: &SourceSpec) -> Result<Box<dyn Signal>, ConfigError> {
    Ok(match source {
        SourceSpec::Noise { color, seed } => NoiseNode::new(*color, *seed).boxed(),
        SourceSpec::Tone {
            waveform,
            frequency,
        } => OscNode::new(*waveform, *frequency)?.boxed(),
        SourceSpec::Drone {
            fundamentals,
            harmonics,
        } => PartialsNode::new(fundamentals, harmonics)?.boxed(),
        SourceSpec::Melody { params, notes } => MelodyNode::new(params, notes)?.boxed(),
        SourceSpec::Chime(params) => ChimeNode::new(params)?.boxed(),
    })
}

fn build_filter(spec: &FilterSpec, sample_rate: f32) -> Result<Box<dyn Processor>, ConfigError> {
    let filter = FilterNode::new(spec.filter_type, spec.cutoff_hz, spec.q, sample_rate)?;
    Ok(match &spec.cutoff_lfo {
        Some(lfo) => filter.modulate(build_lfo(lfo)?, FilterParam::Cutoff).boxed(),
        None => filter.boxed(),
    })
}

fn build_lfo(spec: &LfoSpec) -> Result<LfoNode, ConfigError> {
    LfoNode::new(spec.waveform, spec.frequency, LfoRange::new(spec.min, spec.max)?)
}
