#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;

use crate::error::ConfigError;

/*
Phase Accumulation
==================

An oscillator never evaluates `sin(2π·f·t)` from an absolute clock. It keeps
a running phase and advances it by the time that actually elapsed:

    phase += 2π · f · dt      (mod 2π)

Why this matters:

  - Changing `f` mid-stream (vibrato, modulation) keeps the waveform
    continuous. With `sin(2π·f·t)` a frequency change jumps the phase.
  - The phase is wrapped every step, so it never grows large enough to lose
    float precision after hours of playback.
  - Given the same sequence of `dt` values, two oscillators produce the same
    output. Nothing depends on wall-clock reads inside the render path.

The phase is kept in f64 radians. At 48 kHz an f32 phase drifts audibly on
sub-Hz LFOs after a few minutes; f64 does not.

Waveforms
---------

  Sine       sin(phase)
  Triangle   piecewise linear, peaks at phase = π/2 and 3π/2
  Saw        rises from -1 to +1 over one period
  Square     +1 for the first half period, -1 for the second

Only sine is used by the shipped presets; the others exist for LFO shapes.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

impl Waveform {
    /// Evaluate the waveform at `phase` radians, `phase` in `[0, 2π)`.
    #[inline]
    pub fn evaluate(self, phase: f64) -> f32 {
        let cycle = phase / TAU;
        let value = match self {
            Waveform::Sine => phase.sin(),
            Waveform::Triangle => {
                if cycle < 0.25 {
                    4.0 * cycle
                } else if cycle < 0.75 {
                    2.0 - 4.0 * cycle
                } else {
                    4.0 * cycle - 4.0
                }
            }
            Waveform::Saw => 2.0 * cycle - 1.0,
            Waveform::Square => {
                if cycle < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };
        value as f32
    }
}

/// Reject negative, NaN and infinite frequencies.
pub fn validate_frequency(frequency_hz: f32) -> Result<f32, ConfigError> {
    if frequency_hz.is_finite() && frequency_hz >= 0.0 {
        Ok(frequency_hz)
    } else {
        Err(ConfigError::InvalidFrequency(frequency_hz))
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency_hz: f32,
    initial_phase: f64,
    phase: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency_hz: f32) -> Result<Self, ConfigError> {
        let frequency_hz = validate_frequency(frequency_hz)?;
        Ok(Self {
            waveform,
            frequency_hz,
            initial_phase: 0.0,
            phase: 0.0,
        })
    }

    pub fn sine(frequency_hz: f32) -> Result<Self, ConfigError> {
        Self::new(Waveform::Sine, frequency_hz)
    }

    /// Start (and restart after `reset`) at `phase` radians.
    pub fn with_phase(mut self, phase: f64) -> Self {
        let phase = if phase.is_finite() {
            phase.rem_euclid(TAU)
        } else {
            0.0
        };
        self.initial_phase = phase;
        self.phase = phase;
        self
    }

    /// Output at the current phase, then advance by `dt` seconds.
    #[inline]
    pub fn next_sample(&mut self, dt: f32) -> f32 {
        let value = self.waveform.evaluate(self.phase);
        self.advance(dt);
        value
    }

    /// Advance the phase without producing output.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.advance_at(self.frequency_hz, dt);
    }

    /// Advance the phase at an explicit frequency (vibrato, detune) without
    /// changing the configured one.
    #[inline]
    pub fn advance_at(&mut self, frequency_hz: f32, dt: f32) {
        let step = TAU * frequency_hz.max(0.0) as f64 * dt.max(0.0) as f64;
        self.phase = (self.phase + step).rem_euclid(TAU);
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.waveform.evaluate(self.phase)
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    /// Retune while running. Used by modulation, so values are clamped
    /// rather than rejected.
    pub fn set_frequency(&mut self, frequency_hz: f32) {
        if frequency_hz.is_finite() {
            self.frequency_hz = frequency_hz.max(0.0);
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn reset(&mut self) {
        self.phase = self.initial_phase;
    }
}
