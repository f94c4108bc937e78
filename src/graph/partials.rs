//! Additive harmonic stacks.
//!
//! A `PartialsNode` sums sine partials at integer (or arbitrary) ratios of
//! one or more fundamentals. Organ-like drones are built this way: a root
//! and a fifth, each with the same harmonic recipe at different levels.
//!
//! ```text
//! out = Σ_voices level_v · Σ_harmonics amp_h · sin(phase_{v,h})
//! ```
//!
//! Every partial owns its oscillator, allocated once at construction.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    dsp::oscillator::{validate_frequency, Oscillator},
    error::{ensure_finite, ConfigError},
    graph::node::Signal,
};

/// One overtone: frequency ratio to the fundamental and its amplitude.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub ratio: f32,
    pub amplitude: f32,
}

impl Harmonic {
    pub const fn new(ratio: f32, amplitude: f32) -> Self {
        Self { ratio, amplitude }
    }
}

/// A fundamental and the level its harmonic stack is played at.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fundamental {
    pub frequency: f32,
    pub level: f32,
}

impl Fundamental {
    pub const fn new(frequency: f32, level: f32) -> Self {
        Self { frequency, level }
    }
}

struct Partial {
    osc: Oscillator,
    gain: f32,
}

pub struct PartialsNode {
    partials: Box<[Partial]>,
}

impl PartialsNode {
    /// Every fundamental gets every harmonic, at `level × amplitude`.
    pub fn new(fundamentals: &[Fundamental], harmonics: &[Harmonic]) -> Result<Self, ConfigError> {
        let mut partials = Vec::with_capacity(fundamentals.len() * harmonics.len());

        for fundamental in fundamentals {
            let base = validate_frequency(fundamental.frequency)?;
            let level = ensure_finite("partial_level", fundamental.level)?;

            for harmonic in harmonics {
                let ratio = ensure_finite("harmonic_ratio", harmonic.ratio)?;
                let amplitude = ensure_finite("harmonic_amplitude", harmonic.amplitude)?;
                partials.push(Partial {
                    osc: Oscillator::sine(base * ratio)?,
                    gain: level * amplitude,
                });
            }
        }

        Ok(Self {
            partials: partials.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }
}

impl Signal for PartialsNode {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        let mut value = 0.0;
        for partial in self.partials.iter_mut() {
            value += partial.osc.next_sample(dt) * partial.gain;
        }
        value
    }

    fn reset(&mut self) {
        for partial in self.partials.iter_mut() {
            partial.osc.reset();
        }
    }
}
