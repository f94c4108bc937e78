use crate::MIN_TIME;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Note Envelopes
==============

An envelope shapes a note's amplitude over its lifetime. Ambient voices use
an attack / sustain / release (ASR) shape with smooth curves instead of
linear ramps:

  Level
    1.0 ┐      ___________
        │    ╱             ╲
        │   ╱               ╲
    0.0 └──╱─────────────────╲────→ time
          attack  sustain   release
          sin²               cos²
        0      effective_duration   + release

Why sin² / cos²
---------------

A linear attack starts with a sudden slope (a "corner" at t = 0) which the
ear hears as a click on soft material. sin²(π/2 · p) starts and ends with
zero slope, so the note fades in without a corner and joins the sustain
without a kink. Release mirrors it with cos².

The Effective Duration
----------------------

A note is written with a duration (say a quarter note = 1 s). Phrasing
often shortens what is actually heard to leave a breath before the next
note. The shortened length is the *effective duration*, and it answers two
separate questions:

  1. Is the note active right now?   t < effective_duration + release
  2. Where on the curve are we?      release starts at effective_duration

If those two questions read two different durations (say the written one
for the window and the shortened one for the curve) the voice is cut off
mid-release or held at full level past its window, which is heard as a
click. `NoteEnvelope` therefore stores a single `effective_duration`, set
once at construction, and both `is_active` and `level_at` read it.

Breath shortening:

    effective = max(duration - breath, attack)   if breath > 0
    effective = duration                          otherwise

If the effective duration is still shorter than the attack, the attack is
clamped to it: the note completes its rise at effective_duration and the
release starts from full level. Attack and release never overlap.

Decay Body
----------

Piano-like voices decay while held. `EnvelopeBody::Decay` replaces the flat
sustain with exp(-(t - attack) / time_constant); the release then starts
from whatever level the decay had reached at effective_duration, so the
curve stays continuous.
*/

/// Stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Not triggered, or finished; level = 0
    Attack,  // Rising 0 → 1 along sin²
    Sustain, // Holding (or decaying) until effective_duration
    Release, // Falling to 0 along cos²
}

/// What the envelope does between the attack and effective_duration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeBody {
    /// Hold at 1.0.
    Sustain,
    /// Exponential decay with the given time constant in seconds.
    Decay { time_constant: f32 },
}

/// Compute the audible length of a note once, applying breath shortening.
#[inline]
pub fn effective_duration(duration: f32, breath: f32, attack: f32) -> f32 {
    let duration = duration.max(MIN_TIME);
    if breath > 0.0 {
        (duration - breath).max(attack.max(MIN_TIME))
    } else {
        duration
    }
}

/// Pure envelope shape: level as a function of time since note-on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEnvelope {
    attack: f32,
    release: f32,
    effective_duration: f32,
    body: EnvelopeBody,
}

impl NoteEnvelope {
    /// `duration` is used as-is for the active window.
    pub fn new(attack: f32, duration: f32, release: f32) -> Self {
        Self::breathed(attack, duration, 0.0, release)
    }

    /// Shorten `duration` by `breath` (once) to leave a rest before the
    /// next note.
    pub fn breathed(attack: f32, duration: f32, breath: f32, release: f32) -> Self {
        let attack = attack.max(MIN_TIME);
        let effective_duration = effective_duration(duration, breath, attack);

        Self {
            attack: attack.min(effective_duration),
            release: release.max(MIN_TIME),
            effective_duration,
            body: EnvelopeBody::Sustain,
        }
    }

    pub fn with_body(mut self, body: EnvelopeBody) -> Self {
        self.body = match body {
            EnvelopeBody::Decay { time_constant } => EnvelopeBody::Decay {
                time_constant: time_constant.max(MIN_TIME),
            },
            EnvelopeBody::Sustain => EnvelopeBody::Sustain,
        };
        self
    }

    pub fn effective_duration(&self) -> f32 {
        self.effective_duration
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn release(&self) -> f32 {
        self.release
    }

    /// Time after note-on at which the envelope reaches zero for good.
    pub fn total_length(&self) -> f32 {
        self.effective_duration + self.release
    }

    /// Active-window test. Reads the same `effective_duration` as `level_at`.
    #[inline]
    pub fn is_active(&self, t: f32) -> bool {
        t >= 0.0 && t < self.effective_duration + self.release
    }

    #[inline]
    fn body_level(&self, t: f32) -> f32 {
        match self.body {
            EnvelopeBody::Sustain => 1.0,
            EnvelopeBody::Decay { time_constant } => {
                (-(t - self.attack).max(0.0) / time_constant).exp()
            }
        }
    }

    /// Envelope level at `t` seconds after note-on.
    #[inline]
    pub fn level_at(&self, t: f32) -> f32 {
        if !self.is_active(t) {
            return 0.0;
        }

        if t < self.attack {
            let s = (t / self.attack * std::f32::consts::FRAC_PI_2).sin();
            return s * s;
        }

        if t < self.effective_duration {
            return self.body_level(t);
        }

        let progress = (t - self.effective_duration) / self.release;
        let c = (progress * std::f32::consts::FRAC_PI_2).cos();
        self.body_level(self.effective_duration) * c * c
    }

    pub fn stage_at(&self, t: f32) -> EnvelopeState {
        if !self.is_active(t) {
            EnvelopeState::Idle
        } else if t < self.attack {
            EnvelopeState::Attack
        } else if t < self.effective_duration {
            EnvelopeState::Sustain
        } else {
            EnvelopeState::Release
        }
    }
}

/// Stateful envelope: idle → attack → sustain → release → idle.
///
/// Owns its elapsed time; `trigger` re-enters attack from zero.
#[derive(Debug, Clone)]
pub struct Envelope {
    shape: NoteEnvelope,
    elapsed: f32,
    stage: EnvelopeState,
    level: f32,
}

impl Envelope {
    pub fn new(shape: NoteEnvelope) -> Self {
        Self {
            shape,
            elapsed: 0.0,
            stage: EnvelopeState::Idle,
            level: 0.0,
        }
    }

    pub fn asr(attack: f32, duration: f32, release: f32) -> Self {
        Self::new(NoteEnvelope::new(attack, duration, release))
    }

    /// Note-on: restart the attack from zero.
    pub fn trigger(&mut self) {
        self.elapsed = 0.0;
        self.stage = EnvelopeState::Attack;
        self.level = 0.0;
    }

    /// Level at the current time, then advance by `dt` seconds.
    pub fn next_sample(&mut self, dt: f32) -> f32 {
        if self.stage == EnvelopeState::Idle {
            self.level = 0.0;
            return 0.0;
        }

        self.stage = self.shape.stage_at(self.elapsed);
        self.level = self.shape.level_at(self.elapsed);
        self.elapsed += dt.max(0.0);

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    pub fn render(&mut self, buffer: &mut [f32], dt: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(dt);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn shape(&self) -> &NoteEnvelope {
        &self.shape
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;
    const DT: f32 = 1.0 / SAMPLE_RATE;

    fn render_samples(env: &mut Envelope, samples: usize) -> Vec<f32> {
        (0..samples).map(|_| env.next_sample(DT)).collect()
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Envelope::asr(0.05, 1.0, 0.2);
        env.trigger();
        render_samples(&mut env, 60);

        assert!(env.level() > 0.999, "expected attack to reach full level");
        assert_eq!(env.state(), EnvelopeState::Sustain);
    }

    #[test]
    fn attack_starts_with_zero_slope() {
        let shape = NoteEnvelope::new(0.2, 1.0, 0.2);
        // sin² rises quadratically: the first millisecond is far below linear.
        assert!(shape.level_at(0.001) < 0.001 / 0.2 * 0.1);
    }

    #[test]
    fn release_falls_back_to_idle() {
        let mut env = Envelope::asr(0.01, 0.1, 0.05);
        env.trigger();
        let samples = render_samples(&mut env, 200);

        assert!(samples.last().copied().unwrap_or(1.0) <= 1e-6);
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert!(!env.is_active());
    }

    #[test]
    fn idle_until_triggered() {
        let mut env = Envelope::asr(0.01, 0.1, 0.05);
        assert!(render_samples(&mut env, 10).iter().all(|&s| s == 0.0));
        env.trigger();
        render_samples(&mut env, 10);
        assert!(env.level() > 0.0);
    }

    #[test]
    fn breath_shortens_once() {
        let shape = NoteEnvelope::breathed(0.15, 1.0, 0.08, 0.18);
        assert!((shape.effective_duration() - 0.92).abs() < 1e-6);

        // Breath larger than the note keeps at least the attack.
        let short = NoteEnvelope::breathed(0.15, 0.25, 0.2, 0.18);
        assert!((short.effective_duration() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn attack_is_clamped_to_effective_duration() {
        let shape = NoteEnvelope::new(0.5, 0.1, 0.2);
        assert!((shape.attack() - 0.1).abs() < 1e-6);
        // Reaches full level exactly where release begins.
        assert!((shape.level_at(0.1) - 1.0).abs() < 1e-4);
        assert_eq!(shape.stage_at(0.05), EnvelopeState::Attack);
        assert_eq!(shape.stage_at(0.15), EnvelopeState::Release);
    }

    #[test]
    fn window_and_curve_agree_around_effective_duration() {
        let eps = 1e-4;
        for duration in [0.05, 0.3, 0.75, 1.0, 2.0, 3.0] {
            for breath in [0.0, 0.08, 0.15] {
                let shape = NoteEnvelope::breathed(0.15, duration, breath, 0.18);
                let ed = shape.effective_duration();
                let before = shape.level_at(ed - eps);
                let after = shape.level_at(ed + eps);
                assert!(
                    (before - after).abs() < 1e-3,
                    "discontinuity at ed={ed}: {before} vs {after}"
                );
                assert!(shape.is_active(ed + eps));
            }
        }
    }

    #[test]
    fn window_end_matches_release_end() {
        let shape = NoteEnvelope::breathed(0.1, 1.0, 0.15, 0.5);
        let end = shape.total_length();
        assert!(shape.level_at(end - 1e-3) < 1e-4);
        assert!(!shape.is_active(end));
        assert_eq!(shape.level_at(end + 0.1), 0.0);
    }

    #[test]
    fn decay_body_is_continuous_into_release() {
        let shape = NoteEnvelope::new(0.35, 2.0, 0.5)
            .with_body(EnvelopeBody::Decay { time_constant: 4.5 });
        let ed = shape.effective_duration();
        let before = shape.level_at(ed - 1e-4);
        let after = shape.level_at(ed + 1e-4);
        assert!(before < 1.0);
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn retrigger_restarts_attack() {
        let mut env = Envelope::asr(0.05, 0.2, 0.1);
        env.trigger();
        render_samples(&mut env, 100);
        env.trigger();
        let first = env.next_sample(DT);
        assert_eq!(first, 0.0);
        assert_eq!(env.state(), EnvelopeState::Attack);
    }
}
