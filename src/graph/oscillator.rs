use std::f64::consts::TAU;

use crate::{
    dsp::oscillator::{validate_frequency, Oscillator, Waveform},
    error::{ensure_finite, ConfigError},
    graph::node::{Modulatable, PureSignal, Signal},
};

/*
Tone Sources
============

Two ways to produce a periodic tone:

  OscNode    stateful. Owns an `Oscillator` whose phase advances by the dt
             it is handed. Frequency can be modulated mid-stream without a
             phase jump. This is what presets use.

  PureTone   stateless. `sample_at(t) = a · sin(2π·f·t)` evaluated from an
             absolute time. Useful as a reference: wrapped in `Clocked` it
             must match an `OscNode` at the same frequency.

Example usage:
  let drone = OscNode::sine(130.81)?.with_amplitude(0.5);
  let reference = Clocked::new(PureTone::new(130.81, 0.5)?);
*/

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscParam {
    /// Oscillator frequency in Hz
    Frequency,
    /// Output amplitude (linear)
    Amplitude,
}

pub struct OscNode {
    osc: Oscillator,
    amplitude: f32,
}

impl OscNode {
    pub fn new(waveform: Waveform, frequency_hz: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            osc: Oscillator::new(waveform, frequency_hz)?,
            amplitude: 1.0,
        })
    }

    pub fn sine(frequency_hz: f32) -> Result<Self, ConfigError> {
        Self::new(Waveform::Sine, frequency_hz)
    }

    pub fn triangle(frequency_hz: f32) -> Result<Self, ConfigError> {
        Self::new(Waveform::Triangle, frequency_hz)
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        if amplitude.is_finite() {
            self.amplitude = amplitude;
        }
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.osc = self.osc.with_phase(phase);
        self
    }

    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }
}

impl Signal for OscNode {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        self.osc.next_sample(dt) * self.amplitude
    }

    fn reset(&mut self) {
        self.osc.reset();
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: OscParam) -> f32 {
        match param {
            OscParam::Frequency => self.osc.frequency(),
            OscParam::Amplitude => self.amplitude,
        }
    }

    fn set_param(&mut self, param: OscParam, value: f32) {
        match param {
            OscParam::Frequency => self.osc.set_frequency(value),
            OscParam::Amplitude => {
                if value.is_finite() {
                    self.amplitude = value;
                }
            }
        }
    }
}

/// A fixed sine evaluated from absolute time.
#[derive(Debug, Clone, Copy)]
pub struct PureTone {
    frequency_hz: f64,
    amplitude: f32,
}

impl PureTone {
    pub fn new(frequency_hz: f32, amplitude: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            frequency_hz: validate_frequency(frequency_hz)? as f64,
            amplitude: ensure_finite("amplitude", amplitude)?,
        })
    }
}

impl PureSignal for PureTone {
    #[inline]
    fn sample_at(&self, t: f64) -> f32 {
        // Wrap cycles before scaling so large t keeps its precision.
        let cycles = (self.frequency_hz * t).fract();
        (TAU * cycles).sin() as f32 * self.amplitude
    }
}
