//! Low Frequency Oscillators and the modulation range mapping.

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running below the audible range (here typically
0.01 - 0.5 Hz) whose output moves a parameter instead of being heard:
breathing amplitude on a drone, a slow swell on wave noise, a drifting
filter cutoff on wind.

The underlying math is the same phase accumulator as `dsp/oscillator.rs`.
What differs is how the bipolar output (-1..+1) becomes a parameter value.

One Mapping For Every Parameter
-------------------------------

Every modulated parameter in this crate goes through exactly one formula:

    normalized = (lfo + 1) / 2
    value      = min + (max - min) · normalized

    lfo   normalized   value
    -1.0     0.0        min
     0.0     0.5        (min + max) / 2
    +1.0     1.0        max

`LfoRange::map` is the only implementation of it. Amplitude LFOs, cutoff
LFOs and breathing drones all call it, so a preset that says
"amplitude between 0.02 and 0.12" means exactly that, whatever the target.

Typical rates for ambient material:

    0.01 - 0.03 Hz   30 - 100 s cycles, "breathing" drones
    0.05 - 0.1  Hz   10 - 20 s cycles, wind gusts, wave swells
    0.1  - 0.5  Hz   slow tremolo, shimmer
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::oscillator::{Oscillator, Waveform},
    error::{ensure_finite, ConfigError},
};

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// The `[min, max]` a modulated parameter sweeps through.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoRange {
    pub min: f32,
    pub max: f32,
}

impl LfoRange {
    pub fn new(min: f32, max: f32) -> Result<Self, ConfigError> {
        let min = ensure_finite("lfo_min", min)?;
        let max = ensure_finite("lfo_max", max)?;
        Ok(Self { min, max })
    }

    /// Map a bipolar LFO value onto this range.
    #[inline]
    pub fn map(&self, lfo: f32) -> f32 {
        let normalized = bipolar_to_unipolar(lfo);
        self.min + (self.max - self.min) * normalized
    }

    pub fn center(&self) -> f32 {
        self.map(0.0)
    }
}

/// A sub-audio oscillator producing bipolar control values.
#[derive(Debug, Clone)]
pub struct Lfo {
    osc: Oscillator,
}

impl Lfo {
    pub fn new(waveform: Waveform, frequency_hz: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            osc: Oscillator::new(waveform, frequency_hz)?,
        })
    }

    pub fn sine(frequency_hz: f32) -> Result<Self, ConfigError> {
        Self::new(Waveform::Sine, frequency_hz)
    }

    /// Start the cycle at `phase` radians instead of zero.
    pub fn with_phase(self, phase: f64) -> Self {
        Self {
            osc: self.osc.with_phase(phase),
        }
    }

    /// Current bipolar value, then advance by `dt` seconds.
    #[inline]
    pub fn next_value(&mut self, dt: f32) -> f32 {
        self.osc.next_sample(dt)
    }

    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    pub fn reset(&mut self) {
        self.osc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bipolar_to_unipolar() {
        assert!((bipolar_to_unipolar(-1.0) - 0.0).abs() < 1e-6);
        assert!((bipolar_to_unipolar(0.0) - 0.5).abs() < 1e-6);
        assert!((bipolar_to_unipolar(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn range_maps_extremes_and_center() {
        let range = LfoRange::new(0.02, 0.12).unwrap();
        assert!((range.map(-1.0) - 0.02).abs() < 1e-6);
        assert!((range.map(1.0) - 0.12).abs() < 1e-6);
        assert!((range.center() - 0.07).abs() < 1e-6);
    }

    #[test]
    fn inverted_range_is_allowed() {
        // A falling range simply sweeps the other way.
        let range = LfoRange::new(1.0, 0.0).unwrap();
        assert!((range.map(1.0) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn range_rejects_non_finite_bounds() {
        assert!(LfoRange::new(f32::NAN, 1.0).is_err());
        assert!(LfoRange::new(0.0, f32::INFINITY).is_err());
    }

    #[test]
    fn lfo_completes_one_cycle_per_period() {
        let mut lfo = Lfo::sine(0.5).unwrap();
        let dt = 0.001;
        let start = lfo.next_value(dt);
        for _ in 0..1_999 {
            lfo.next_value(dt);
        }
        // After exactly one period (2 s) we are back at the start value.
        assert!((lfo.next_value(dt) - start).abs() < 1e-4);
    }
}
