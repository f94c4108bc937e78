//! Looping melodic line with breathing phrasing.
//!
//! A `MelodyNode` owns one pre-built voice per written note. Each voice keeps
//! its start time, its `NoteEnvelope` (breath already applied, once) and an
//! additive harmonic stack. Nothing is allocated while rendering; the note
//! list is only walked to test windows.
//!
//! ```text
//! loop:  |--E--G--|A--------A-C-B.-G-|C-D-C---B---| ...   (loop_beats)
//!         ^ start = ((bar - 1) · beats_per_bar + beat) · beat_seconds
//!
//! per note:   written duration  = beats · beat_seconds
//!             effective         = max(written - breath, attack)  (breath > 0)
//!             window            = [start, start + effective + release)
//! ```
//!
//! `MelodyParams::body` picks what a held note does: organ-like voices
//! sustain, piano-like ones decay exponentially until their release.
//!
//! A note whose release runs past the loop end carries over into the next
//! pass (its window wraps), so the last note of a phrase never gets cut.

use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    dsp::{
        envelope::{EnvelopeBody, NoteEnvelope},
        oscillator::{validate_frequency, Oscillator, Waveform},
    },
    error::{ensure_finite, ConfigError},
    graph::{node::Signal, partials::Harmonic},
};

/// Note lengths in beats.
pub mod beats {
    pub const SIXTEENTH: f32 = 0.25;
    pub const EIGHTH: f32 = 0.5;
    pub const DOTTED_EIGHTH: f32 = 0.75;
    pub const QUARTER: f32 = 1.0;
    pub const HALF: f32 = 2.0;
    pub const DOTTED_HALF: f32 = 3.0;
}

/// Breath lengths in seconds.
pub mod breath {
    pub const NONE: f32 = 0.0;
    pub const SHORT: f32 = 0.08;
    pub const LONG: f32 = 0.15;
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyNote {
    pub frequency: f32,
    /// 1-based bar in the loop.
    pub bar: u32,
    /// Beat within the bar, from 0.
    pub beat: f32,
    /// Written length in beats.
    pub beats: f32,
    /// Seconds taken off the end of the note before the next one.
    pub breath: f32,
    /// Relative loudness, multiplied into the line's gain.
    pub level: f32,
}

impl MelodyNote {
    pub const fn new(frequency: f32, bar: u32, beat: f32, beats: f32) -> Self {
        Self::breathed(frequency, bar, beat, beats, breath::NONE)
    }

    pub const fn breathed(frequency: f32, bar: u32, beat: f32, beats: f32, breath: f32) -> Self {
        Self {
            frequency,
            bar,
            beat,
            beats,
            breath,
            level: 1.0,
        }
    }

    pub const fn with_level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    /// Beats from the loop start.
    pub fn start_beat(&self, beats_per_bar: f32) -> f32 {
        self.bar.saturating_sub(1) as f32 * beats_per_bar + self.beat
    }
}

/// Gentle gain reduction for high notes, which otherwise poke out of a mix.
///
/// Notes at `threshold_hz` or above lose up to `amount` of their gain,
/// reached at `ceiling_hz`.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighNoteTaper {
    pub threshold_hz: f32,
    pub ceiling_hz: f32,
    pub amount: f32,
}

impl HighNoteTaper {
    pub fn gain(&self, frequency: f32) -> f32 {
        if frequency < self.threshold_hz {
            return 1.0;
        }
        let span = (self.ceiling_hz - self.threshold_hz).max(f32::EPSILON);
        let ratio = ((frequency - self.threshold_hz) / span).min(1.0);
        1.0 - ratio * self.amount.clamp(0.0, 1.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyParams {
    pub beat_seconds: f32,
    pub beats_per_bar: f32,
    pub loop_beats: f32,
    pub transpose_semitones: f32,
    pub harmonics: &'static [Harmonic],
    pub attack: f32,
    pub release: f32,
    pub body: EnvelopeBody,
    pub vibrato_rate: f32,
    /// Vibrato depth as a phase offset, in cycles.
    pub vibrato_depth: f32,
    pub gain: f32,
    pub taper: Option<HighNoteTaper>,
}

struct Partial {
    osc: Oscillator,
    amplitude: f32,
}

struct Voice {
    start: f64,
    envelope: NoteEnvelope,
    gain: f32,
    partials: Box<[Partial]>,
    sounding: bool,
}

impl Voice {
    fn restart(&mut self) {
        for partial in self.partials.iter_mut() {
            partial.osc.reset();
        }
    }
}

pub struct MelodyNode {
    voices: Box<[Voice]>,
    vibrato: Oscillator,
    vibrato_depth: f64,
    loop_seconds: f64,
    position: f64,
    wrapped: bool,
}

impl MelodyNode {
    pub fn new(params: &MelodyParams, notes: &[MelodyNote]) -> Result<Self, ConfigError> {
        let beat_seconds = positive("beat_seconds", params.beat_seconds)?;
        let beats_per_bar = positive("beats_per_bar", params.beats_per_bar)?;
        let loop_seconds = positive("loop_beats", params.loop_beats)? * beat_seconds;
        let transpose = 2f32.powf(ensure_finite("transpose_semitones", params.transpose_semitones)? / 12.0);
        let attack = ensure_finite("attack", params.attack)?;
        let release = ensure_finite("release", params.release)?;
        let gain = ensure_finite("gain", params.gain)?;
        let stack_gain = 1.0 / params.harmonics.len().max(1) as f32;

        let mut voices = Vec::with_capacity(notes.len());
        for note in notes {
            let frequency = validate_frequency(note.frequency * transpose)?;
            let start_beat = ensure_finite("beat", note.start_beat(beats_per_bar))?;
            if start_beat < 0.0 || start_beat >= params.loop_beats {
                return Err(ConfigError::InvalidParameter {
                    name: "beat",
                    value: start_beat,
                });
            }

            let envelope = NoteEnvelope::breathed(
                attack,
                positive("beats", note.beats)? * beat_seconds,
                ensure_finite("breath", note.breath)?,
                release,
            )
            .with_body(params.body);
            if envelope.total_length() >= loop_seconds {
                return Err(ConfigError::InvalidParameter {
                    name: "beats",
                    value: note.beats,
                });
            }

            let mut partials = Vec::with_capacity(params.harmonics.len());
            for harmonic in params.harmonics {
                partials.push(Partial {
                    osc: Oscillator::sine(frequency * ensure_finite("harmonic_ratio", harmonic.ratio)?)?,
                    amplitude: ensure_finite("harmonic_amplitude", harmonic.amplitude)?,
                });
            }

            let taper = params.taper.map_or(1.0, |taper| taper.gain(frequency));
            let level = ensure_finite("level", note.level)?;
            voices.push(Voice {
                start: (start_beat * beat_seconds) as f64,
                envelope,
                gain: gain * taper * level * stack_gain,
                partials: partials.into_boxed_slice(),
                sounding: false,
            });
        }

        Ok(Self {
            voices: voices.into_boxed_slice(),
            vibrato: Oscillator::sine(params.vibrato_rate)?,
            vibrato_depth: ensure_finite("vibrato_depth", params.vibrato_depth)? as f64,
            loop_seconds: loop_seconds as f64,
            position: 0.0,
            wrapped: false,
        })
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn loop_seconds(&self) -> f32 {
        self.loop_seconds as f32
    }
}

fn positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

impl Signal for MelodyNode {
    fn next_sample(&mut self, dt: f32) -> f32 {
        let offset = TAU * self.vibrato.next_sample(dt) as f64 * self.vibrato_depth;
        let mut value = 0.0;

        for voice in self.voices.iter_mut() {
            let mut since_start = self.position - voice.start;
            if since_start < 0.0 && self.wrapped {
                since_start += self.loop_seconds;
            }

            let t = since_start as f32;
            if !voice.envelope.is_active(t) {
                voice.sounding = false;
                continue;
            }
            if !voice.sounding {
                voice.sounding = true;
                voice.restart();
            }

            let mut tone = 0.0;
            for partial in voice.partials.iter_mut() {
                tone += Waveform::Sine.evaluate(partial.osc.phase() + offset) * partial.amplitude;
                partial.osc.advance(dt);
            }
            value += tone * voice.envelope.level_at(t) * voice.gain;
        }

        self.position += dt.max(0.0) as f64;
        if self.position >= self.loop_seconds {
            self.position -= self.loop_seconds;
            self.wrapped = true;
        }

        value
    }

    fn reset(&mut self) {
        self.vibrato.reset();
        self.position = 0.0;
        self.wrapped = false;
        for voice in self.voices.iter_mut() {
            voice.sounding = false;
            voice.restart();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;
    const DT: f32 = 1.0 / SAMPLE_RATE;

    const SINE: [Harmonic; 1] = [Harmonic::new(1.0, 1.0)];

    fn params(loop_beats: f32) -> MelodyParams {
        MelodyParams {
            beat_seconds: 0.5,
            beats_per_bar: 4.0,
            loop_beats,
            transpose_semitones: 0.0,
            harmonics: &SINE,
            attack: 0.05,
            release: 0.1,
            body: EnvelopeBody::Sustain,
            vibrato_rate: 4.0,
            vibrato_depth: 0.0,
            gain: 1.0,
            taper: None,
        }
    }

    fn render(node: &mut MelodyNode, seconds: f32) -> Vec<f32> {
        (0..(seconds * SAMPLE_RATE) as usize)
            .map(|_| node.next_sample(DT))
            .collect()
    }

    #[test]
    fn breath_shortens_once() {
        let notes = [
            MelodyNote::breathed(440.0, 1, 0.0, beats::QUARTER, breath::LONG),
            MelodyNote::new(440.0, 1, 1.0, beats::QUARTER),
        ];
        let node = MelodyNode::new(&params(4.0), &notes).unwrap();
        let durations: Vec<f32> = node
            .voices
            .iter()
            .map(|v| v.envelope.effective_duration())
            .collect();
        assert!((durations[0] - (0.5 - breath::LONG)).abs() < 1e-6);
        assert!((durations[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn silent_outside_note_windows() {
        // Note plays for 0.5 s + 0.1 s release, then 1.4 s of rest.
        let notes = [MelodyNote::new(440.0, 1, 0.0, beats::QUARTER)];
        let mut node = MelodyNode::new(&params(4.0), &notes).unwrap();
        let out = render(&mut node, 2.0);

        let tail_start = (0.62 * SAMPLE_RATE) as usize;
        let tail_end = (1.99 * SAMPLE_RATE) as usize;
        assert!(out[tail_start..tail_end].iter().all(|&s| s == 0.0));
        assert!(out[..tail_start].iter().any(|&s| s.abs() > 0.5));
    }

    #[test]
    fn no_clicks_at_phrase_boundaries() {
        let notes = [
            MelodyNote::breathed(220.0, 1, 0.0, beats::QUARTER, breath::SHORT),
            MelodyNote::breathed(247.0, 1, 1.0, beats::EIGHTH, breath::LONG),
            MelodyNote::new(262.0, 1, 1.5, beats::DOTTED_EIGHTH),
            MelodyNote::new(294.0, 1, 2.25, beats::SIXTEENTH),
        ];
        let mut node = MelodyNode::new(&params(4.0), &notes).unwrap();
        let out = render(&mut node, 4.0);

        // 294 Hz at full level moves at most 2π·294/48000 ≈ 0.04 per sample.
        let max_step = out
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0f32, f32::max);
        assert!(max_step < 0.09, "max step {max_step}");
    }

    #[test]
    fn last_note_release_wraps_into_next_pass() {
        // Note ends exactly at the loop boundary, release continues after it.
        let notes = [MelodyNote::new(440.0, 1, 3.0, beats::QUARTER)];
        let mut node = MelodyNode::new(&params(4.0), &notes).unwrap();

        let first_pass = render(&mut node, 2.0);
        // Nothing wraps into the very first pass.
        assert!(first_pass[..(0.1 * SAMPLE_RATE) as usize].iter().all(|&s| s == 0.0));

        let second_pass = render(&mut node, 0.05);
        assert!(second_pass.iter().any(|&s| s.abs() > 0.05));
    }

    #[test]
    fn deterministic_after_reset() {
        let notes = [
            MelodyNote::new(330.0, 1, 0.0, beats::HALF),
            MelodyNote::new(392.0, 1, 2.0, beats::HALF),
        ];
        let mut node = MelodyNode::new(&MelodyParams { vibrato_depth: 0.001, ..params(4.0) }, &notes)
            .unwrap();
        let first = render(&mut node, 0.5);
        node.reset();
        let second = render(&mut node, 0.5);
        assert_eq!(first, second);
    }

    #[test]
    fn decaying_body_fades_while_held() {
        let notes = [MelodyNote::new(440.0, 1, 0.0, beats::HALF * 2.0)];
        let decaying = MelodyParams {
            body: EnvelopeBody::Decay { time_constant: 0.5 },
            ..params(8.0)
        };
        let mut node = MelodyNode::new(&decaying, &notes).unwrap();
        let out = render(&mut node, 2.0);

        let peak = |from: f32, to: f32| {
            out[(from * SAMPLE_RATE) as usize..(to * SAMPLE_RATE) as usize]
                .iter()
                .fold(0.0f32, |acc, s| acc.max(s.abs()))
        };
        // Written length is 2 s; by 1.8 s the level is down to exp(-3.5).
        let early = peak(0.05, 0.15);
        let late = peak(1.8, 1.95);
        assert!(early > 0.9, "early peak {early}");
        assert!(late < early * 0.05, "late peak {late}");
    }

    #[test]
    fn note_level_scales_its_voice() {
        let loud = [MelodyNote::new(440.0, 1, 0.0, beats::QUARTER)];
        let quiet = [MelodyNote::new(440.0, 1, 0.0, beats::QUARTER).with_level(0.25)];
        let a = render(&mut MelodyNode::new(&params(4.0), &loud).unwrap(), 0.4);
        let b = render(&mut MelodyNode::new(&params(4.0), &quiet).unwrap(), 0.4);
        for (x, y) in a.iter().zip(&b) {
            assert!((x * 0.25 - y).abs() < 1e-6);
        }
    }

    #[test]
    fn taper_softens_high_notes() {
        let taper = HighNoteTaper {
            threshold_hz: 600.0,
            ceiling_hz: 1_046.5,
            amount: 0.35,
        };
        assert_eq!(taper.gain(440.0), 1.0);
        assert!((taper.gain(1_046.5) - 0.65).abs() < 1e-6);
        assert!((taper.gain(4_000.0) - 0.65).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_notes() {
        assert!(MelodyNode::new(&params(4.0), &[MelodyNote::new(f32::NAN, 1, 0.0, 1.0)]).is_err());
        assert!(MelodyNode::new(&params(4.0), &[MelodyNote::new(440.0, 2, 1.0, 1.0)]).is_err());
        assert!(MelodyNode::new(&params(4.0), &[MelodyNote::new(440.0, 1, 0.0, 0.0)]).is_err());
        assert!(MelodyNode::new(&params(0.0), &[]).is_err());
        assert!(MelodyNode::new(
            &params(4.0),
            &[MelodyNote::new(440.0, 1, 0.0, 1.0).with_level(f32::NAN)]
        )
        .is_err());
    }
}
