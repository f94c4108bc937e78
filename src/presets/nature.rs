//! Filtered-noise nature scenes.
//!
//! # Ocean waves
//!
//! White noise shaped by a swell built from three overlapping sines
//! (6.7 s, 12.5 s and 4 s periods) around a level of 0.5, then darkened by
//! two cascaded 2 kHz lowpasses for a muffled, far-off surf. Seed 42.
//!
//! ```text
//! swell = clamp(0.5 + 0.3·sin(0.15 Hz) + 0.2·sin(0.08 Hz) + 0.15·sin(0.25 Hz), 0, 1)
//! ```
//!
//! The sum can reach -0.15 and 1.15; the clamp keeps the surf from
//! inverting in the troughs.
//!
//! # Rain
//!
//! Three noise bands, each with its own seed:
//!
//! - heavy drops: lowpass 800 Hz
//! - light rain: bandpass around 2 kHz (roughly 1 to 4 kHz)
//! - hiss: highpass 3 kHz
//!
//! All three share a slow 20 s intensity drift between 0.6 and 1.0.
//!
//! # Forest wind
//!
//! A soft pink-noise breeze under two lowpasses (2.5 kHz, then 5 kHz),
//! swaying ±20% over 20 s. Above it, leaves: white noise kept to roughly
//! 2-8 kHz, gated by a swell that sits below zero most of the time so the
//! rustle comes and goes in gusts.

use super::{AmplitudeSpec, FilterSpec, LayerDef, LfoSpec, Preset, SourceSpec, DEFAULT_LIMITER};
use crate::dsp::{filter::FilterType, noise::NoiseColor};

const SURF_LOWPASS: FilterSpec = FilterSpec::new(FilterType::LowPass, 2_000.0, 0.707);

pub(super) static OCEAN_WAVES_V1: Preset = Preset {
    id: "ocean_waves_v1",
    family: "ocean_waves",
    version: 1,
    title: "Ocean Waves",
    layers: &[LayerDef {
        name: "surf",
        source: SourceSpec::Noise {
            color: NoiseColor::White,
            seed: 42,
        },
        filters: &[SURF_LOWPASS, SURF_LOWPASS],
        amplitude: AmplitudeSpec::Swell {
            base: 0.5,
            lfos: &[
                LfoSpec::sine(0.15, -0.3, 0.3),
                LfoSpec::sine(0.08, -0.2, 0.2),
                LfoSpec::sine(0.25, -0.15, 0.15),
            ],
        },
        gain: 1.6,
    }],
    filter: None,
    reverb: None,
    limiter: DEFAULT_LIMITER,
};

const RAIN_INTENSITY: AmplitudeSpec = AmplitudeSpec::Lfo(LfoSpec::sine(0.05, 0.6, 1.0));

pub(super) static RAIN_V1: Preset = Preset {
    id: "rain_v1",
    family: "rain",
    version: 1,
    title: "Rain",
    layers: &[
        LayerDef {
            name: "drops",
            source: SourceSpec::Noise {
                color: NoiseColor::White,
                seed: 123,
            },
            filters: &[FilterSpec::new(FilterType::LowPass, 800.0, 0.707)],
            amplitude: RAIN_INTENSITY,
            gain: 0.5,
        },
        LayerDef {
            name: "light",
            source: SourceSpec::Noise {
                color: NoiseColor::White,
                seed: 124,
            },
            filters: &[FilterSpec::new(FilterType::BandPass, 2_000.0, 0.67)],
            amplitude: RAIN_INTENSITY,
            gain: 0.7,
        },
        LayerDef {
            name: "hiss",
            source: SourceSpec::Noise {
                color: NoiseColor::White,
                seed: 125,
            },
            filters: &[FilterSpec::new(FilterType::HighPass, 3_000.0, 0.707)],
            amplitude: RAIN_INTENSITY,
            gain: 0.35,
        },
    ],
    filter: None,
    reverb: None,
    limiter: DEFAULT_LIMITER,
};

pub(super) static FOREST_WIND_V1: Preset = Preset {
    id: "forest_wind_v1",
    family: "forest_wind",
    version: 1,
    title: "Forest Wind",
    layers: &[
        LayerDef {
            name: "wind",
            source: SourceSpec::Noise {
                color: NoiseColor::Pink,
                seed: 314,
            },
            filters: &[
                FilterSpec::new(FilterType::LowPass, 2_500.0, 0.707),
                FilterSpec::new(FilterType::LowPass, 5_000.0, 0.707),
            ],
            amplitude: AmplitudeSpec::Lfo(LfoSpec::sine(0.05, 0.8, 1.2)),
            gain: 0.4,
        },
        LayerDef {
            name: "leaves",
            source: SourceSpec::Noise {
                color: NoiseColor::White,
                seed: 315,
            },
            filters: &[
                FilterSpec::new(FilterType::HighPass, 2_000.0, 0.707),
                FilterSpec::new(FilterType::LowPass, 8_000.0, 0.707),
            ],
            amplitude: AmplitudeSpec::Swell {
                base: -0.25,
                lfos: &[
                    LfoSpec::sine(0.21, -0.35, 0.35),
                    LfoSpec::sine(0.13, -0.25, 0.25),
                    LfoSpec::sine(0.47, -0.15, 0.15),
                ],
            },
            gain: 0.3,
        },
    ],
    filter: None,
    reverb: None,
    limiter: DEFAULT_LIMITER,
};
