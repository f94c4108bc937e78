//! Plain and lightly shaped noise beds.
//!
//! # Pink noise
//!
//! Equal energy per octave, the classic "soft rain on a window" bed. Seed 999.
//!
//! # Brown noise
//!
//! Steeper -6 dB/octave rolloff, a low rumble like distant surf or a
//! running engine. Seed 2024.
//!
//! # Gentle breeze
//!
//! Pink noise whose level drifts between 0.02 and 0.12 on a 0.06 Hz sine
//! (one gust every ~17 s), through a lowpass whose cutoff wanders between
//! 600 and 1600 Hz so the gusts also brighten and darken.

use super::{AmplitudeSpec, FilterSpec, LayerDef, LfoSpec, Preset, SourceSpec, DEFAULT_LIMITER};
use crate::dsp::{filter::FilterType, noise::NoiseColor};

pub(super) static PINK_NOISE_V1: Preset = Preset {
    id: "pink_noise_v1",
    family: "pink_noise",
    version: 1,
    title: "Pink Noise",
    layers: &[LayerDef {
        name: "pink",
        source: SourceSpec::Noise {
            color: NoiseColor::Pink,
            seed: 999,
        },
        filters: &[],
        amplitude: AmplitudeSpec::Constant(1.0),
        gain: 1.5,
    }],
    filter: None,
    reverb: None,
    limiter: DEFAULT_LIMITER,
};

pub(super) static BROWN_NOISE_V1: Preset = Preset {
    id: "brown_noise_v1",
    family: "brown_noise",
    version: 1,
    title: "Brown Noise",
    layers: &[LayerDef {
        name: "brown",
        source: SourceSpec::Noise {
            color: NoiseColor::Brown,
            seed: 2024,
        },
        filters: &[],
        amplitude: AmplitudeSpec::Constant(1.0),
        gain: 0.8,
    }],
    filter: None,
    reverb: None,
    limiter: DEFAULT_LIMITER,
};

/// Level swing of the breeze.
pub(crate) const BREEZE_LFO: LfoSpec = LfoSpec::sine(0.06, 0.02, 0.12);

pub(super) static GENTLE_BREEZE_V1: Preset = Preset {
    id: "gentle_breeze_v1",
    family: "gentle_breeze",
    version: 1,
    title: "Gentle Breeze",
    layers: &[LayerDef {
        name: "gusts",
        source: SourceSpec::Noise {
            color: NoiseColor::Pink,
            seed: 7,
        },
        filters: &[FilterSpec::new(FilterType::LowPass, 1_000.0, 0.707)
            .with_cutoff_lfo(LfoSpec::sine(0.05, 600.0, 1_600.0))],
        amplitude: AmplitudeSpec::Lfo(BREEZE_LFO),
        gain: 4.0,
    }],
    filter: None,
    reverb: None,
    limiter: DEFAULT_LIMITER,
};
