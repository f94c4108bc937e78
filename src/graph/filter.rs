use crate::{
    dsp::filter::{FilterType, SVFilter},
    error::ConfigError,
    graph::node::{Modulatable, Processor},
};

/*
State-Variable Filter Node
==========================

Wraps the TPT `SVFilter` as an in-place `Processor`. In an ambient patch the
filter mostly shapes noise into something recognisable:

  Lowpass (LP): Passes frequencies BELOW the cutoff.
    - 600 - 2000 Hz on white/pink noise: surf, distant wind
    - Lower cutoff = darker, further away

  Highpass (HP): Passes frequencies ABOVE the cutoff.
    - 3000+ Hz on white noise: rain hiss, leaves

  Bandpass (BP): Passes frequencies AROUND the cutoff.
    - 1000 - 4000 Hz: light rain, whistling gusts

  Notch: Removes a band around the cutoff, passes everything else.

Parameters:
-----------

Cutoff (Hz): clamped to [10 Hz, 0.49 · sample rate].

Q: resonance at the cutoff. 0.707 is a flat (Butterworth) response; higher
values add a peak. Clamped to [0.1, 20].

Example usage:
  let surf = NoiseNode::white(42)
      .through(FilterNode::lowpass(2_000.0, 0.707, sr)?);

  // Cutoff drifting between 600 and 1600 Hz
  let swell = FilterNode::lowpass(1_000.0, 0.707, sr)?
      .modulate(LfoNode::sine(0.08, LfoRange::new(600.0, 1_600.0)?)?, FilterParam::Cutoff);
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterParam {
    Cutoff,
    Resonance,
}

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn new(
        filter_type: FilterType,
        cutoff_hz: f32,
        q: f32,
        sample_rate: f32,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            filter: SVFilter::new(filter_type, cutoff_hz, q, sample_rate)?,
        })
    }

    pub fn lowpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Result<Self, ConfigError> {
        Self::new(FilterType::LowPass, cutoff_hz, q, sample_rate)
    }

    pub fn highpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Result<Self, ConfigError> {
        Self::new(FilterType::HighPass, cutoff_hz, q, sample_rate)
    }

    pub fn bandpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Result<Self, ConfigError> {
        Self::new(FilterType::BandPass, cutoff_hz, q, sample_rate)
    }

    pub fn filter(&self) -> &SVFilter {
        &self.filter
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.filter.cutoff(),
            FilterParam::Resonance => self.filter.q(),
        }
    }

    fn set_param(&mut self, param: Self::Param, value: f32) {
        match param {
            FilterParam::Cutoff => self.filter.set_cutoff(value),
            FilterParam::Resonance => self.filter.set_q(value),
        }
    }
}

impl Processor for FilterNode {
    #[inline]
    fn process(&mut self, input: f32, _dt: f32) -> f32 {
        self.filter.process_sample(input)
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}
