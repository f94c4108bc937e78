//! Versioned, immutable preset catalog.
//!
//! A preset is plain data: which sources to build, how loud, what filters and
//! which reverb. [`build`] turns one into a fresh [`FinalMixer`] and is the
//! only place graphs get constructed.
//!
//! # Versioning
//!
//! Preset ids carry their version (`rain_v1`). Once an id has shipped, its
//! numbers are frozen: a listener who liked `rain_v1` must hear the same rain
//! next year. A better rain is published as `rain_v2` next to it, and the old
//! id keeps resolving. The catalog is append-only.
//!
//! [`FinalMixer`]: crate::engine::mixer::FinalMixer

mod builder;
mod cathedral;
mod gymnopedie;
mod nature;
mod noise;

#[cfg(feature = "serde")]
use serde::Serialize;

pub use builder::build;

use crate::{
    dsp::{
        filter::FilterType,
        limiter::LimiterParams,
        noise::NoiseColor,
        oscillator::Waveform,
        reverb::ReverbParams,
    },
    error::ConfigError,
    graph::{
        chime::ChimeParams,
        melody::{MelodyNote, MelodyParams},
        partials::{Fundamental, Harmonic},
    },
};

/// A low-frequency oscillator mapped onto `[min, max]`.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoSpec {
    pub waveform: Waveform,
    pub frequency: f32,
    pub min: f32,
    pub max: f32,
}

impl LfoSpec {
    pub const fn sine(frequency: f32, min: f32, max: f32) -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency,
            min,
            max,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub filter_type: FilterType,
    pub cutoff_hz: f32,
    pub q: f32,
    /// Cutoff driven by an LFO whose range is in Hz.
    pub cutoff_lfo: Option<LfoSpec>,
}

impl FilterSpec {
    pub const fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            filter_type,
            cutoff_hz,
            q,
            cutoff_lfo: None,
        }
    }

    pub const fn with_cutoff_lfo(mut self, lfo: LfoSpec) -> Self {
        self.cutoff_lfo = Some(lfo);
        self
    }
}

/// What produces a layer's raw signal.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceSpec {
    Noise {
        color: NoiseColor,
        seed: u64,
    },
    Tone {
        waveform: Waveform,
        frequency: f32,
    },
    Drone {
        fundamentals: &'static [Fundamental],
        harmonics: &'static [Harmonic],
    },
    Melody {
        params: MelodyParams,
        notes: &'static [MelodyNote],
    },
    Chime(ChimeParams),
}

/// How a layer's level moves over time.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmplitudeSpec {
    Constant(f32),
    Lfo(LfoSpec),
    /// `base` plus the sum of several LFOs, for swells built from
    /// overlapping periods. Clamped to `[0, 1]`.
    Swell {
        base: f32,
        lfos: &'static [LfoSpec],
    },
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDef {
    pub name: &'static str,
    pub source: SourceSpec,
    /// Applied in order, before the amplitude.
    pub filters: &'static [FilterSpec],
    pub amplitude: AmplitudeSpec,
    /// Static mixer gain.
    pub gain: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    /// Stable identifier, `<family>_v<version>`.
    pub id: &'static str,
    pub family: &'static str,
    pub version: u32,
    pub title: &'static str,
    pub layers: &'static [LayerDef],
    /// Filter on the summed layers.
    pub filter: Option<FilterSpec>,
    pub reverb: Option<ReverbParams>,
    pub limiter: LimiterParams,
}

/// Limiter settings shared by every preset shipped so far.
pub(crate) const DEFAULT_LIMITER: LimiterParams = LimiterParams {
    drive: 1.2,
    ceiling: 0.95,
};

static CATALOG: [&Preset; 8] = [
    &noise::PINK_NOISE_V1,
    &noise::BROWN_NOISE_V1,
    &noise::GENTLE_BREEZE_V1,
    &nature::OCEAN_WAVES_V1,
    &nature::RAIN_V1,
    &cathedral::CATHEDRAL_STILLNESS_V1,
    &gymnopedie::MOONLIT_GYMNOPEDIE_V1,
    &nature::FOREST_WIND_V1,
];

/// Every published preset, oldest first.
pub fn catalog() -> &'static [&'static Preset] {
    &CATALOG
}

pub fn find(id: &str) -> Result<&'static Preset, ConfigError> {
    CATALOG
        .iter()
        .copied()
        .find(|preset| preset.id == id)
        .ok_or_else(|| ConfigError::UnknownPreset(id.to_string()))
}

/// Newest version of a preset family.
pub fn latest(family: &str) -> Option<&'static Preset> {
    CATALOG
        .iter()
        .copied()
        .filter(|preset| preset.family == family)
        .max_by_key(|preset| preset.version)
}
