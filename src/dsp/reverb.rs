//! Reverb - Room Simulation via Delay Networks
//!
//! Reverb simulates the sound of a space by creating many delayed, filtered
//! reflections of the input signal. This implementation uses the classic
//! Schroeder reverb algorithm with a predelay in front.
//!
//! # Schroeder Reverb Architecture
//!
//! ```text
//!                          ┌──→ [Comb 1] ──┐
//! Input ──→ [Predelay] ────┼──→ [Comb 2] ──┤
//!                          ├──→ [Comb 3] ──┼──→ (+)/4 ──→ [AP 1..4] ──→ Wet
//!                          └──→ [Comb 4] ──┘
//!
//! Output = Input · (1 - mix) + Wet · mix     (blended by the caller)
//! ```
//!
//! ## Comb Filters
//!
//! A comb filter creates a series of equally-spaced echoes that decay over time.
//! A one-pole low-pass in the loop absorbs high frequencies on each pass:
//!
//! ```text
//! s[n] = y[n - delay] · (1 - damping) + s[n - 1] · damping
//! y[n] = x[n] + decay · s[n]
//! ```
//!
//! The delay lengths are chosen to share no common factors so their echoes
//! do not pile up on the same samples.
//!
//! ## Allpass Filters
//!
//! Allpass filters pass all frequencies equally but shift their phase. In reverb,
//! they add density and diffusion without coloring the sound.
//!
//! ```text
//! y[n] = -g · x[n] + x[n - delay] + g · y[n - delay]
//! ```
//!
//! # Parameters
//!
//! - **Room Size**: Scales the comb delay times (larger = sparser, longer tail)
//! - **Damping**: High-frequency absorption (higher = darker sound)
//! - **Decay**: Comb feedback, sets the tail length
//! - **Mix**: Wet/dry balance
//! - **Predelay**: Gap before the first reflection
//!
//! Every delay line is allocated once in [`SchroederReverb::new`], sized for
//! the requested room at the given sample rate. Processing never allocates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::validate_sample_rate,
    dsp::mix::blend_dry_wet,
    error::{ensure_finite, ConfigError},
};

/// Comb delays in samples at the reference rate.
const COMB_DELAYS: [usize; 4] = [1557, 1617, 1491, 1422];
/// Allpass delays in samples at the reference rate.
const ALLPASS_DELAYS: [usize; 4] = [225, 556, 441, 341];
const REFERENCE_RATE: f32 = 48_000.0;
const ALLPASS_FEEDBACK: f32 = 0.5;

pub const MIN_ROOM_SIZE: f32 = 0.25;
pub const MAX_ROOM_SIZE: f32 = 3.0;
pub const MAX_DECAY: f32 = 0.98;
pub const MAX_PREDELAY_SECONDS: f32 = 0.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    pub room_size: f32,
    pub damping: f32,
    pub decay: f32,
    pub mix: f32,
    /// Seconds.
    pub predelay: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 1.0,
            damping: 0.5,
            decay: 0.7,
            mix: 0.3,
            predelay: 0.02,
        }
    }
}

impl ReverbParams {
    /// Reject non-finite values, clamp the rest into their usable ranges.
    pub fn sanitized(&self) -> Result<Self, ConfigError> {
        Ok(Self {
            room_size: ensure_finite("reverb_room_size", self.room_size)?
                .clamp(MIN_ROOM_SIZE, MAX_ROOM_SIZE),
            damping: ensure_finite("reverb_damping", self.damping)?.clamp(0.0, 1.0),
            decay: ensure_finite("reverb_decay", self.decay)?.clamp(0.0, MAX_DECAY),
            mix: ensure_finite("reverb_mix", self.mix)?.clamp(0.0, 1.0),
            predelay: ensure_finite("reverb_predelay", self.predelay)?
                .clamp(0.0, MAX_PREDELAY_SECONDS),
        })
    }
}

/// Fixed-length circular delay line.
#[derive(Debug, Clone)]
struct DelayLine {
    buffer: Box<[f32]>,
    pos: usize,
}

impl DelayLine {
    fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)].into_boxed_slice(),
            pos: 0,
        }
    }

    /// Oldest sample in the line, i.e. the one written `len` samples ago.
    #[inline]
    fn read(&self) -> f32 {
        self.buffer[self.pos]
    }

    #[inline]
    fn write_and_advance(&mut self, value: f32) {
        self.buffer[self.pos] = value;
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

/// Damped feedback comb filter.
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: DelayLine,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            line: DelayLine::new(delay_samples),
            feedback: 0.5,
            damp: 0.5,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_DECAY);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    pub fn delay_samples(&self) -> usize {
        self.line.len()
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.line.read();

        // One-pole lowpass filter for damping (absorbs high frequencies)
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;

        self.line
            .write_and_advance(input + self.filter_state * self.feedback);

        output
    }

    pub fn reset(&mut self) {
        self.line.clear();
        self.filter_state = 0.0;
    }
}

/// Schroeder allpass diffuser.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: DelayLine,
    feedback: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            line: DelayLine::new(delay_samples),
            feedback: ALLPASS_FEEDBACK,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.9);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.read();

        // Allpass: output = -g*input + delayed + g*delayed_output
        let output = -self.feedback * input + delayed;

        self.line.write_and_advance(input + self.feedback * output);

        output
    }

    pub fn reset(&mut self) {
        self.line.clear();
    }
}

/// Plain delay used in front of the comb bank.
#[derive(Debug, Clone)]
struct Predelay {
    line: Option<DelayLine>,
}

impl Predelay {
    fn new(delay_samples: usize) -> Self {
        Self {
            line: (delay_samples > 0).then(|| DelayLine::new(delay_samples)),
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        match self.line.as_mut() {
            Some(line) => {
                let out = line.read();
                line.write_and_advance(input);
                out
            }
            None => input,
        }
    }

    fn reset(&mut self) {
        if let Some(line) = self.line.as_mut() {
            line.clear();
        }
    }
}

/// Schroeder reverb with 4 comb filters and 4 allpass filters.
#[derive(Debug, Clone)]
pub struct SchroederReverb {
    params: ReverbParams,
    sample_rate: f32,
    predelay: Predelay,
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 4],
}

fn scaled_delay(reference_samples: usize, scale: f32, sample_rate: f32) -> usize {
    let samples = reference_samples as f32 * scale * sample_rate / REFERENCE_RATE;
    (samples as usize).max(1)
}

impl SchroederReverb {
    /// Create a reverb for `params` at `sample_rate`, allocating every delay
    /// line up front.
    pub fn new(params: ReverbParams, sample_rate: f32) -> Result<Self, ConfigError> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        let params = params.sanitized()?;

        let combs = COMB_DELAYS.map(|reference| {
            let mut comb = CombFilter::new(scaled_delay(reference, params.room_size, sample_rate));
            comb.set_feedback(params.decay);
            comb.set_damp(params.damping);
            comb
        });
        let allpasses =
            ALLPASS_DELAYS.map(|reference| AllpassFilter::new(scaled_delay(reference, 1.0, sample_rate)));

        let predelay_samples = (params.predelay * sample_rate) as usize;

        Ok(Self {
            params,
            sample_rate,
            predelay: Predelay::new(predelay_samples),
            combs,
            allpasses,
        })
    }

    pub fn params(&self) -> &ReverbParams {
        &self.params
    }

    /// Run one sample and return the wet signal only. The caller blends it
    /// with the dry signal using [`mix`](Self::mix).
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.predelay.process(input);

        // Sum outputs of all comb filters (parallel)
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(delayed);
        }
        output *= 0.25; // Normalize for 4 combs

        // Pass through allpass filters (series)
        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }

        output
    }

    pub fn mix(&self) -> f32 {
        self.params.mix
    }

    /// Process a buffer in place, blending wet and dry by `mix`.
    pub fn render(&mut self, buffer: &mut [f32]) {
        let mix = self.params.mix;
        for sample in buffer.iter_mut() {
            let wet = self.process(*sample);
            *sample = blend_dry_wet(*sample, wet, mix);
        }
    }

    /// Approximate time for the tail to fall by 60 dB, plus the predelay.
    pub fn tail_seconds(&self) -> f32 {
        let longest = self
            .combs
            .iter()
            .map(CombFilter::delay_samples)
            .max()
            .unwrap_or(1) as f32
            / self.sample_rate;

        if self.params.decay <= f32::EPSILON {
            return longest + self.params.predelay;
        }
        // Each pass through the loop attenuates by `decay`.
        let passes = -3.0 / self.params.decay.log10();
        passes * longest + self.params.predelay
    }

    /// Clear every delay line and damping state.
    pub fn reset(&mut self) {
        self.predelay.reset();
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }
}
