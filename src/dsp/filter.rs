use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ConfigError};

/*
| type              | output   | passes          | rejects      |
| ----------------- | -------- | --------------- | ------------ |
| low-pass          | v2       | below cutoff    | above cutoff |
| high-pass         | x-kv1-v2 | above cutoff    | below cutoff |
| band-pass         | v1       | around cutoff   | outside      |
| notch / band-stop | x-kv1    | outside         | around       |

Trapezoidal (TPT) state variable filter, after Andrew Simper's "linear
trapezoidal integrated SVF". Two integrators are discretised with the
trapezoidal rule and the resulting implicit equation is solved per sample:

    g  = tan(π · fc / sr)       prewarped integrator gain
    k  = 1 / Q                  damping
    g1 = 1 / (1 + g·(g + k))

    v3 = x - ic2
    v1 = g1 · (ic1 + g·v3)      band-pass
    v2 = ic2 + g·v1             low-pass
    ic1 = 2·v1 - ic1
    ic2 = 2·v2 - ic2

For any g > 0 and k > 0 the poles stay inside the unit circle, so the
filter is stable over the whole cutoff/Q range. Nothing here feeds a
difference equation with unbounded coefficients: `tan` only blows up at
fc = sr/2, which the cutoff clamp keeps us away from.

The coefficients are recomputed only when cutoff or Q change, never per
sample.
*/

/// Lowest cutoff accepted; lower values are clamped.
pub const MIN_CUTOFF_HZ: f32 = 10.0;
/// Cutoff ceiling as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.49;
pub const MIN_Q: f32 = 0.1;
pub const MAX_Q: f32 = 20.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

impl FilterOutputs {
    #[inline]
    pub fn select(&self, filter_type: FilterType) -> f32 {
        match filter_type {
            FilterType::LowPass => self.lowpass,
            FilterType::HighPass => self.highpass,
            FilterType::BandPass => self.bandpass,
            FilterType::Notch => self.notch,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    g: f32,
    k: f32,
    g1: f32,

    cutoff_hz: f32,
    q: f32,
    sample_rate: f32,
    filter_type: FilterType,
}

/// Clamp a requested cutoff into the range the filter can realise.
#[inline]
pub fn clamp_cutoff(cutoff_hz: f32, sample_rate: f32) -> f32 {
    cutoff_hz.clamp(MIN_CUTOFF_HZ, sample_rate * MAX_CUTOFF_RATIO)
}

impl SVFilter {
    /// Out-of-range cutoff and Q are clamped; non-finite values are rejected.
    pub fn new(
        filter_type: FilterType,
        cutoff_hz: f32,
        q: f32,
        sample_rate: f32,
    ) -> Result<Self, ConfigError> {
        let sample_rate = crate::config::validate_sample_rate(sample_rate)?;
        let cutoff_hz = ensure_finite("filter_cutoff", cutoff_hz)?;
        let q = ensure_finite("filter_q", q)?;

        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            g1: 0.0,
            cutoff_hz: clamp_cutoff(cutoff_hz, sample_rate),
            q: q.clamp(MIN_Q, MAX_Q),
            sample_rate,
            filter_type,
        };
        filter.update_coefficients();
        Ok(filter)
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

    pub fn notch(cutoff_hz: f32, q: f32, sample_rate: f32) -> Result<Self, ConfigError> {
        Self::new(FilterType::Notch, cutoff_hz, q, sample_rate)
    }

    fn update_coefficients(&mut self) {
        self.g = (PI * self.cutoff_hz / self.sample_rate).tan();
        self.k = 1.0 / self.q;
        self.g1 = 1.0 / (1.0 + self.g * (self.g + self.k));
    }

    /// Run one sample through the filter and return every response.
    #[inline]
    pub fn process(&mut self, sample: f32) -> FilterOutputs {
        let v3 = sample - self.ic2eq;
        let v1 = self.g1 * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - self.k * v1 - v2,
            notch: sample - self.k * v1,
        }
    }

    /// Run one sample and return the configured response.
    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let filter_type = self.filter_type;
        self.process(sample).select(filter_type)
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// Retune while running. Clamped into range; non-finite values are ignored.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if !cutoff_hz.is_finite() {
            return;
        }
        let cutoff_hz = clamp_cutoff(cutoff_hz, self.sample_rate);
        if cutoff_hz != self.cutoff_hz {
            self.cutoff_hz = cutoff_hz;
            self.update_coefficients();
        }
    }

    pub fn set_q(&mut self, q: f32) {
        if !q.is_finite() {
            return;
        }
        let q = q.clamp(MIN_Q, MAX_Q);
        if q != self.q {
            self.q = q;
            self.update_coefficients();
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::noise::NoiseSource;
    use crate::dsp::oscillator::Oscillator;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn sine_block(freq: f32, len: usize) -> Vec<f32> {
        let mut osc = Oscillator::sine(freq).unwrap();
        (0..len).map(|_| osc.next_sample(1.0 / SAMPLE_RATE)).collect()
    }

    fn max_abs(outputs: &FilterOutputs) -> f32 {
        outputs
            .lowpass
            .abs()
            .max(outputs.bandpass.abs())
            .max(outputs.highpass.abs())
            .max(outputs.notch.abs())
    }

    #[test]
    fn test_lowpass_basic() {
        let mut filter = SVFilter::lowpass(500.0, 0.707, SAMPLE_RATE).unwrap();
        let mut buffer = vec![1.0; 1_024];

        filter.render(&mut buffer);

        assert!(buffer[1_023] > 0.99, "dc should pass, got {}", buffer[1_023]);
    }

    #[test]
    fn test_highpass_basic() {
        let mut filter = SVFilter::highpass(500.0, 0.707, SAMPLE_RATE).unwrap();
        let mut buffer = vec![1.0; 1_024];

        filter.render(&mut buffer);

        assert!(buffer[1_023].abs() < 0.001);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let mut filter = SVFilter::lowpass(500.0, 0.707, SAMPLE_RATE).unwrap();
        let mut buffer = sine_block(5_000.0, 1_024); // 10x cutoff

        filter.render(&mut buffer);

        // 12 dB/octave over ~3.3 octaves
        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "expected high freq attenuation, got peak: {peak}");
    }

    #[test]
    fn test_bandpass_emphasizes_cutoff_frequency() {
        let mut filter = SVFilter::bandpass(1_000.0, 2.0, SAMPLE_RATE).unwrap();
        let mut pass = sine_block(1_000.0, 2_048);
        filter.render(&mut pass);
        let pass_peak = peak_after_transient(&pass);

        filter.reset();
        let mut off = sine_block(200.0, 2_048);
        filter.render(&mut off);
        let off_peak = peak_after_transient(&off);

        assert!(
            pass_peak > off_peak * 2.0,
            "pass_peak={pass_peak}, off_peak={off_peak}"
        );
    }

    #[test]
    fn test_notch_rejects_cutoff_frequency() {
        let mut filter = SVFilter::notch(1_000.0, 2.0, SAMPLE_RATE).unwrap();
        let mut center = sine_block(1_000.0, 4_096);
        filter.render(&mut center);
        let center_peak = peak_after_transient(&center[2_048..]);

        filter.reset();
        let mut off = sine_block(200.0, 4_096);
        filter.render(&mut off);
        let off_peak = peak_after_transient(&off[2_048..]);

        assert!(
            center_peak * 2.0 < off_peak,
            "center_peak={center_peak}, off_peak={off_peak}"
        );
    }

    #[test]
    fn set_cutoff_clamps_and_affects_filtering() {
        let mut filter = SVFilter::lowpass(200.0, 0.707, SAMPLE_RATE).unwrap();
        let mut low = sine_block(1_000.0, 1_024);
        filter.render(&mut low);
        let peak_low_cutoff = peak_after_transient(&low);

        filter.reset();
        filter.set_cutoff(5_000.0);
        let mut high = sine_block(1_000.0, 1_024);
        filter.render(&mut high);
        let peak_high_cutoff = peak_after_transient(&high);

        assert!(peak_high_cutoff > peak_low_cutoff * 2.0);

        filter.set_cutoff(1.0e9);
        assert!((filter.cutoff() - SAMPLE_RATE * MAX_CUTOFF_RATIO).abs() < 1e-3);
        filter.set_cutoff(0.0);
        assert_eq!(filter.cutoff(), MIN_CUTOFF_HZ);
        filter.set_cutoff(f32::NAN);
        assert_eq!(filter.cutoff(), MIN_CUTOFF_HZ);
    }

    #[test]
    fn higher_q_boosts_cutoff_frequency() {
        let mut filter = SVFilter::lowpass(1_000.0, 0.5, SAMPLE_RATE).unwrap();
        let mut flat = sine_block(1_000.0, 4_096);
        filter.render(&mut flat);
        let peak_low_q = peak_after_transient(&flat[2_048..]);

        filter.reset();
        filter.set_q(4.0);
        let mut peaked = sine_block(1_000.0, 4_096);
        filter.render(&mut peaked);
        let peak_high_q = peak_after_transient(&peaked[2_048..]);

        assert!(peak_high_q > peak_low_q * 1.2);
    }

    #[test]
    fn rejects_non_finite_parameters() {
        assert!(SVFilter::lowpass(f32::NAN, 1.0, SAMPLE_RATE).is_err());
        assert!(SVFilter::lowpass(1_000.0, f32::INFINITY, SAMPLE_RATE).is_err());
        assert!(SVFilter::lowpass(1_000.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn stable_across_cutoff_and_q_grid() {
        let cutoffs = [20.0, 100.0, 1_000.0, 3_500.0, 10_000.0, SAMPLE_RATE * 0.49];
        let qs = [0.5, 0.707, 1.0, 2.0, 5.0, 10.0];

        for &cutoff in &cutoffs {
            for &q in &qs {
                let mut filter = SVFilter::lowpass(cutoff, q, SAMPLE_RATE).unwrap();

                // Impulse
                for n in 0..10_000 {
                    let x = if n == 0 { 1.0 } else { 0.0 };
                    let out = filter.process(x);
                    assert!(max_abs(&out) < 10.0, "impulse fc={cutoff} q={q}");
                }

                // Step
                filter.reset();
                for _ in 0..10_000 {
                    let out = filter.process(1.0);
                    assert!(max_abs(&out) < 10.0, "step fc={cutoff} q={q}");
                }

                // Alternating sign at Nyquist
                filter.reset();
                for n in 0..10_000 {
                    let x = if n % 2 == 0 { 1.0 } else { -1.0 };
                    let out = filter.process(x);
                    assert!(max_abs(&out) < 10.0, "nyquist fc={cutoff} q={q}");
                }
            }
        }
    }

    #[test]
    fn stable_at_3500_hz_on_noise() {
        let mut filter = SVFilter::lowpass(3_500.0, 1.0, SAMPLE_RATE).unwrap();
        let mut noise = NoiseSource::white(999);

        for _ in 0..SAMPLE_RATE as usize * 2 {
            let out = filter.process(noise.next_sample());
            assert!(out.lowpass.is_finite());
            assert!(max_abs(&out) < 10.0);
        }
    }
}
