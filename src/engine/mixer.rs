//! The composition root: layers, effects chain and fades.
//!
//! ```text
//!   layer 0 ─(× gain)─┐
//!   layer 1 ─(× gain)─┼─► Σ ─► filter ─► reverb (dry/wet) ─► limiter ─► × fade ─► out
//!   layer n ─(× gain)─┘
//! ```
//!
//! Layers are summed in the order they were added, then the chain runs in a
//! fixed order, so a given preset renders the same samples on every run.
//! The filter and reverb stages are optional; the limiter always runs.
//!
//! A `FinalMixer` belongs to exactly one preset activation. Switching
//! presets builds a new one; the old instance is faded out and dropped, never
//! re-armed. `reset_effects_state` exists for callers that must reuse an
//! instance and clears every filter integrator and delay line.
//!
//! Every buffer is allocated in [`FinalMixer::new`]; `render` never
//! allocates and never fails.

use crate::{
    config::{ms_to_samples, validate_sample_rate},
    dsp::{
        fade::{Fade, FadeCurve},
        limiter::SoftLimiter,
        mix::accumulate,
        reverb::SchroederReverb,
    },
    error::{ensure_finite, ConfigError},
    graph::node::{Processor, RenderCtx, Signal},
    MAX_BLOCK_SIZE,
};

/// Where the mixer's output gain stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerState {
    /// Output gain is zero and no fade is running.
    Silent,
    FadingIn,
    /// Output gain is non-zero and steady.
    Playing,
    FadingOut,
}

struct Layer {
    signal: Box<dyn Signal>,
    gain: f32,
}

pub struct FinalMixer {
    layers: Vec<Layer>,
    filter: Option<Box<dyn Processor>>,
    reverb: Option<SchroederReverb>,
    limiter: SoftLimiter,
    fade: Fade,
    fade_curve: FadeCurve,
    ctx: RenderCtx,
    layer_buffer: Box<[f32]>,
}

impl FinalMixer {
    /// An empty mixer at `sample_rate`, muted until a fade-in is applied.
    ///
    /// `max_frames` sizes the internal scratch buffer; `render` accepts any
    /// length and works through longer buffers in chunks.
    pub fn new(sample_rate: f32, max_frames: usize) -> Result<Self, ConfigError> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        if max_frames == 0 {
            return Err(ConfigError::InvalidFrameCount(max_frames));
        }

        Ok(Self {
            layers: Vec::new(),
            filter: None,
            reverb: None,
            limiter: SoftLimiter::default(),
            fade: Fade::constant(0.0),
            fade_curve: FadeCurve::Linear,
            ctx: RenderCtx::new(sample_rate),
            layer_buffer: vec![0.0; max_frames.min(MAX_BLOCK_SIZE)].into_boxed_slice(),
        })
    }

    /// Register a signal graph. Gains are fixed for the mixer's lifetime.
    pub fn add_layer(&mut self, signal: Box<dyn Signal>, gain: f32) -> Result<(), ConfigError> {
        let gain = ensure_finite("layer_gain", gain)?;
        if gain < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "layer_gain",
                value: gain,
            });
        }
        self.layers.push(Layer { signal, gain });
        Ok(())
    }

    pub fn set_filter(&mut self, filter: Box<dyn Processor>) {
        self.filter = Some(filter);
    }

    pub fn set_reverb(&mut self, reverb: SchroederReverb) {
        self.reverb = Some(reverb);
    }

    pub fn set_limiter(&mut self, limiter: SoftLimiter) {
        self.limiter = limiter;
    }

    /// Curve used by `apply_fade_in` / `apply_fade_out`.
    pub fn set_fade_curve(&mut self, curve: FadeCurve) {
        self.fade_curve = curve;
    }

    /// Ramp the output gain from where it is now up to unity.
    pub fn apply_fade_in(&mut self, duration_ms: f32) {
        self.fade_to(1.0, duration_ms, self.fade_curve);
    }

    /// Ramp the output gain from where it is now down to silence.
    pub fn apply_fade_out(&mut self, duration_ms: f32) {
        self.fade_to(0.0, duration_ms, self.fade_curve);
    }

    /// Ramp to `target` over `duration_ms`, starting from the current gain so
    /// an interrupted fade never jumps.
    pub fn fade_to(&mut self, target: f32, duration_ms: f32, curve: FadeCurve) {
        let target = if target.is_finite() { target.clamp(0.0, 1.0) } else { 0.0 };
        let samples = ms_to_samples(duration_ms, self.ctx.sample_rate);
        self.fade = Fade::new(self.fade.current(), target, samples, curve);
    }

    /// Zero the filter integrators and every reverb delay line.
    pub fn reset_effects_state(&mut self) {
        if let Some(filter) = self.filter.as_mut() {
            filter.reset();
        }
        if let Some(reverb) = self.reverb.as_mut() {
            reverb.reset();
        }
    }

    /// Render `out.len()` mono frames.
    pub fn render(&mut self, out: &mut [f32]) {
        let chunk_len = self.layer_buffer.len();
        for chunk in out.chunks_mut(chunk_len) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        let scratch = &mut self.layer_buffer[..out.len()];
        for layer in self.layers.iter_mut() {
            layer.signal.render_block(scratch, &self.ctx);
            accumulate(out, scratch, layer.gain);
        }

        if let Some(filter) = self.filter.as_mut() {
            filter.process_block(out, &self.ctx);
        }
        if let Some(reverb) = self.reverb.as_mut() {
            reverb.render(out);
        }
        self.limiter.render(out);

        for sample in out.iter_mut() {
            *sample *= self.fade.next_gain();
        }
    }

    pub fn state(&self) -> MixerState {
        let gain = self.fade.current();
        if !self.fade.is_finished() {
            if self.fade.target() > gain {
                MixerState::FadingIn
            } else {
                MixerState::FadingOut
            }
        } else if gain <= 0.0 {
            MixerState::Silent
        } else {
            MixerState::Playing
        }
    }

    pub fn gain(&self) -> f32 {
        self.fade.current()
    }

    pub fn is_fade_finished(&self) -> bool {
        self.fade.is_finished()
    }

    /// Output gain is zero and will stay there until the next fade-in.
    pub fn is_silent(&self) -> bool {
        self.state() == MixerState::Silent
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    pub fn ceiling(&self) -> f32 {
        self.limiter.ceiling()
    }

    /// How long the reverb keeps ringing after the input stops.
    pub fn tail_seconds(&self) -> f32 {
        self.reverb.as_ref().map_or(0.0, SchroederReverb::tail_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::{envelope::NoteEnvelope, lfo::LfoRange, limiter::LimiterParams, reverb::ReverbParams},
        graph::{
            amplify::Constant,
            envelope::EnvNode,
            extensions::{ProcessorExt, SignalExt},
            filter::{FilterNode, FilterParam},
            lfo::LfoNode,
            noise::NoiseNode,
            oscillator::OscNode,
        },
    };

    const SAMPLE_RATE: f32 = 48_000.0;

    fn tone_mixer() -> FinalMixer {
        let mut mixer = FinalMixer::new(SAMPLE_RATE, 512).unwrap();
        mixer
            .add_layer(OscNode::sine(220.0).unwrap().boxed(), 0.5)
            .unwrap();
        mixer
    }

    #[test]
    fn starts_silent() {
        let mut mixer = tone_mixer();
        assert_eq!(mixer.state(), MixerState::Silent);

        let mut out = vec![1.0; 256];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn layers_sum_in_order_with_gains() {
        let mut mixer = FinalMixer::new(SAMPLE_RATE, 64).unwrap();
        mixer.add_layer(Constant(0.25).boxed(), 1.0).unwrap();
        mixer.add_layer(Constant(0.5).boxed(), 0.5).unwrap();
        mixer.apply_fade_in(0.0);

        let mut out = vec![0.0; 16];
        mixer.render(&mut out);

        let expected = mixer.limiter.process(0.5);
        assert!(out.iter().all(|&s| (s - expected).abs() < 1e-6));
    }

    #[test]
    fn fade_in_is_monotonic_without_overshoot() {
        let mut mixer = FinalMixer::new(SAMPLE_RATE, 512).unwrap();
        mixer.add_layer(Constant(0.5).boxed(), 1.0).unwrap();
        mixer.apply_fade_in(100.0);
        assert_eq!(mixer.state(), MixerState::FadingIn);

        let mut out = vec![0.0; 4_800];
        mixer.render(&mut out);

        let target = mixer.limiter.process(0.5);
        for pair in out.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(out.iter().all(|&s| s <= target * 1.01));
        assert!((out[4_799] - target).abs() < 1e-4);
        assert_eq!(mixer.state(), MixerState::Playing);
    }

    #[test]
    fn fade_out_reaches_silence() {
        let mut mixer = tone_mixer();
        mixer.apply_fade_in(0.0);
        mixer.apply_fade_out(50.0);

        let mut out = vec![0.0; 2_400];
        mixer.render(&mut out);
        assert!(mixer.is_silent());

        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn interrupted_fade_starts_from_current_gain() {
        let mut mixer = tone_mixer();
        mixer.apply_fade_in(100.0);
        let mut out = vec![0.0; 2_400];
        mixer.render(&mut out);

        let halfway = mixer.gain();
        assert!(halfway > 0.4 && halfway < 0.6);

        mixer.apply_fade_out(100.0);
        assert_eq!(mixer.gain(), halfway);
    }

    #[test]
    fn output_never_exceeds_ceiling() {
        let mut mixer = FinalMixer::new(SAMPLE_RATE, 256).unwrap();
        for seed in 0..4 {
            mixer.add_layer(NoiseNode::white(seed).boxed(), 3.0).unwrap();
        }
        mixer.set_filter(
            FilterNode::lowpass(3_500.0, 8.0, SAMPLE_RATE)
                .unwrap()
                .modulate(
                    LfoNode::sine(3.0, LfoRange::new(20.0, 20_000.0).unwrap()).unwrap(),
                    FilterParam::Cutoff,
                )
                .boxed(),
        );
        let params = ReverbParams {
            decay: 0.98,
            ..ReverbParams::default()
        };
        mixer.set_reverb(SchroederReverb::new(params, SAMPLE_RATE).unwrap());
        mixer.set_limiter(SoftLimiter::new(LimiterParams { drive: 4.0, ceiling: 0.9 }).unwrap());
        mixer.apply_fade_in(0.0);

        // Odd block size exercises the chunking path.
        let mut out = vec![0.0; 1_000];
        for _ in 0..48 {
            mixer.render(&mut out);
            assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 0.9));
        }
    }

    #[test]
    fn reset_effects_state_clears_tail() {
        let mut mixer = FinalMixer::new(SAMPLE_RATE, 512).unwrap();
        let burst = OscNode::sine(440.0)
            .unwrap()
            .amplify(EnvNode::triggered(NoteEnvelope::new(0.001, 0.05, 0.001)));
        mixer.add_layer(burst.boxed(), 1.0).unwrap();
        let params = ReverbParams {
            decay: 0.9,
            mix: 1.0,
            ..ReverbParams::default()
        };
        mixer.set_reverb(SchroederReverb::new(params, SAMPLE_RATE).unwrap());
        mixer.apply_fade_in(0.0);

        let mut out = vec![0.0; 4_800];
        mixer.render(&mut out);
        mixer.render(&mut out);
        assert!(out.iter().any(|&s| s.abs() > 1e-4), "tail should still ring");

        mixer.reset_effects_state();
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(FinalMixer::new(0.0, 512).is_err());
        assert!(FinalMixer::new(SAMPLE_RATE, 0).is_err());

        let mut mixer = tone_mixer();
        assert!(mixer.add_layer(Constant(1.0).boxed(), f32::NAN).is_err());
        assert!(mixer.add_layer(Constant(1.0).boxed(), -1.0).is_err());
        assert_eq!(mixer.layer_count(), 1);
    }

    #[test]
    fn reports_reverb_tail() {
        let mut mixer = tone_mixer();
        assert_eq!(mixer.tail_seconds(), 0.0);
        mixer.set_reverb(SchroederReverb::new(ReverbParams::default(), SAMPLE_RATE).unwrap());
        assert!(mixer.tail_seconds() > 0.1);
    }
}
