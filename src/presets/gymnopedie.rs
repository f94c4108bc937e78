//! Moonlit Gymnopédie: Satie's Gymnopédie No. 1 as three sine lines
//! (bass, chords, melody) in a wide, soft room.
//!
//! 3/4 at 88 BPM (0.682 s per beat), D major, 41 bars (about 84 s) so the
//! last chord has two bars to ring out before the loop starts again.
//!
//! Every line uses a decaying body, so held notes fade like struck strings
//! instead of sustaining like an organ:
//!
//! ```text
//! line     attack   decay τ   gain    pattern
//! bass     0.20 s   3.5 s     0.16    beat 1 of every bar
//! chords   0.08 s   2.5 s     0.06    beats 2-3, two notes
//! melody   0.15 s   4.5 s     0.28    bars 5-39, quieter staggered chords at the end
//! ```
//!
//! Bars alternate G (B-D above) and D (A-C♯ above), except the E minor
//! passages in bars 9-12 and 19-21 (E with B-D).

use super::{AmplitudeSpec, LayerDef, Preset, SourceSpec, DEFAULT_LIMITER};
use crate::{
    dsp::{envelope::EnvelopeBody, reverb::ReverbParams},
    graph::{
        melody::{beats, HighNoteTaper, MelodyNote, MelodyParams},
        partials::Harmonic,
    },
};

const D3: f32 = 146.83;
const E3: f32 = 164.81;
const G3: f32 = 196.00;
const A3: f32 = 220.00;
const B3: f32 = 246.94;
const CS4: f32 = 277.18;
const D4: f32 = 293.66;
const E4: f32 = 329.63;
const FS4: f32 = 369.99;
const G4: f32 = 392.00;
const A4: f32 = 440.00;
const B4: f32 = 493.88;
const C5: f32 = 523.25;
const CS5: f32 = 554.37;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const F5: f32 = 698.46;
const FS5: f32 = 739.99;
const G5: f32 = 783.99;
const A5: f32 = 880.00;
const E6: f32 = 1318.51;

const BEAT_SECONDS: f32 = 0.682;
const LOOP_BEATS: f32 = 41.0 * 3.0;

const SINE: &[Harmonic] = &[Harmonic::new(1.0, 1.0)];

const MELODY_NOTES: &[MelodyNote] = &[
    // Bars 1-4: bass and chords alone.
    // Bar 5
    MelodyNote::new(FS5, 5, 1.0, beats::QUARTER),
    MelodyNote::new(A5, 5, 2.0, beats::QUARTER),
    // Bar 6
    MelodyNote::new(G5, 6, 0.0, beats::QUARTER),
    MelodyNote::new(FS5, 6, 1.0, beats::QUARTER),
    MelodyNote::new(CS5, 6, 2.0, beats::QUARTER),
    // Bar 7
    MelodyNote::new(B4, 7, 0.0, beats::QUARTER),
    MelodyNote::new(CS5, 7, 1.0, beats::QUARTER),
    MelodyNote::new(D5, 7, 2.0, beats::QUARTER),
    // Bar 8
    MelodyNote::new(A4, 8, 0.0, beats::DOTTED_HALF),
    // Bars 9-12: long F♯ over E minor
    MelodyNote::new(FS4, 9, 0.0, 12.0),

    // Bar 13
    MelodyNote::new(FS5, 13, 1.0, beats::QUARTER),
    MelodyNote::new(A5, 13, 2.0, beats::QUARTER),
    // Bar 14
    MelodyNote::new(G5, 14, 0.0, beats::QUARTER),
    MelodyNote::new(FS5, 14, 1.0, beats::QUARTER),
    MelodyNote::new(CS5, 14, 2.0, beats::QUARTER),
    // Bar 15
    MelodyNote::new(B4, 15, 0.0, beats::QUARTER),
    MelodyNote::new(CS5, 15, 1.0, beats::QUARTER),
    MelodyNote::new(D5, 15, 2.0, beats::QUARTER),
    // Bars 16-18
    MelodyNote::new(A4, 16, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(CS5, 17, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(FS5, 18, 0.0, beats::DOTTED_HALF),
    // Bars 19-21: long E
    MelodyNote::new(E5, 19, 0.0, 9.0),

    // Bar 22
    MelodyNote::new(A4, 22, 0.0, beats::QUARTER),
    MelodyNote::new(B4, 22, 1.0, beats::QUARTER),
    MelodyNote::new(C5, 22, 2.0, beats::QUARTER),
    // Bar 23
    MelodyNote::new(E5, 23, 0.0, beats::QUARTER),
    MelodyNote::new(D5, 23, 1.0, beats::QUARTER),
    MelodyNote::new(B4, 23, 2.0, beats::QUARTER),
    // Bar 24, alto enters on beat 2
    MelodyNote::new(D5, 24, 0.0, beats::QUARTER),
    MelodyNote::new(C5, 24, 1.0, beats::QUARTER),
    MelodyNote::new(B4, 24, 2.0, beats::QUARTER),
    MelodyNote::new(E4, 24, 1.0, beats::HALF),
    // Bars 25-26
    MelodyNote::new(D5, 25, 0.0, 5.0),
    MelodyNote::new(D4, 25, 1.0, beats::HALF),
    MelodyNote::new(D5, 26, 2.0, beats::QUARTER),
    MelodyNote::new(D4, 26, 1.0, beats::HALF),

    // Bar 27: ascending
    MelodyNote::new(E5, 27, 0.0, beats::QUARTER),
    MelodyNote::new(F5, 27, 1.0, beats::QUARTER),
    MelodyNote::new(G5, 27, 2.0, beats::QUARTER),
    // Bar 28
    MelodyNote::new(A5, 28, 0.0, beats::QUARTER),
    MelodyNote::new(C5, 28, 1.0, beats::QUARTER),
    MelodyNote::new(D5, 28, 2.0, beats::QUARTER),
    // Bar 29
    MelodyNote::new(E5, 29, 0.0, beats::QUARTER),
    MelodyNote::new(D5, 29, 1.0, beats::QUARTER),
    MelodyNote::new(B4, 29, 2.0, beats::QUARTER),
    MelodyNote::new(E4, 29, 1.0, beats::HALF),
    // Bars 30-31
    MelodyNote::new(D5, 30, 0.0, 5.0),
    MelodyNote::new(D4, 30, 1.0, beats::HALF),
    MelodyNote::new(D5, 31, 2.0, beats::QUARTER),
    MelodyNote::new(D4, 31, 1.0, beats::HALF),

    // Bars 32-33
    MelodyNote::new(G5, 32, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(FS5, 33, 0.0, beats::DOTTED_HALF),
    // Bar 34
    MelodyNote::new(B4, 34, 0.0, beats::QUARTER),
    MelodyNote::new(A4, 34, 1.0, beats::QUARTER),
    MelodyNote::new(B4, 34, 2.0, beats::QUARTER),
    // Bar 35
    MelodyNote::new(CS5, 35, 0.0, beats::QUARTER),
    MelodyNote::new(D5, 35, 1.0, beats::QUARTER),
    MelodyNote::new(E5, 35, 2.0, beats::QUARTER),
    // Bar 36
    MelodyNote::new(CS5, 36, 0.0, beats::QUARTER),
    MelodyNote::new(D5, 36, 1.0, beats::QUARTER),
    MelodyNote::new(E5, 36, 2.0, beats::QUARTER),
    // Bar 37
    MelodyNote::new(FS4, 37, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D4, 37, 1.0, beats::QUARTER),
    MelodyNote::new(G4, 37, 2.0, beats::QUARTER),

    // Bar 38: A minor, voices entering one after another
    MelodyNote::new(A3, 38, 0.0, 3.5).with_level(0.5),
    MelodyNote::new(E4, 38, 0.12, 3.3).with_level(0.36),
    MelodyNote::new(A4, 38, 0.24, 3.1).with_level(0.32),
    // Bar 39: final D major
    MelodyNote::new(D3, 39, 0.0, 6.0).with_level(0.57),
    MelodyNote::new(D4, 39, 0.12, 5.8).with_level(0.36),
    MelodyNote::new(A4, 39, 0.21, 5.5).with_level(0.43),
    MelodyNote::new(D5, 39, 0.3, 5.2).with_level(0.29),
];

const BASS_NOTES: &[MelodyNote] = &[
    MelodyNote::new(G3, 1, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 2, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 3, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 4, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 5, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 6, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 7, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 8, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(E3, 9, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(E3, 10, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(E3, 11, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(E3, 12, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 13, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 14, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 15, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 16, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 17, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 18, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(E3, 19, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(E3, 20, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(E3, 21, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 22, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 23, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 24, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 25, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 26, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 27, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 28, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 29, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 30, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 31, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 32, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 33, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 34, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 35, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 36, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 37, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 38, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 39, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(D3, 40, 0.0, beats::DOTTED_HALF),
    MelodyNote::new(G3, 41, 0.0, beats::DOTTED_HALF),
];

const CHORD_NOTES: &[MelodyNote] = &[
    MelodyNote::new(B3, 1, 1.0, beats::HALF),
    MelodyNote::new(D4, 1, 1.0, beats::HALF),
    MelodyNote::new(A3, 2, 1.0, beats::HALF),
    MelodyNote::new(CS4, 2, 1.0, beats::HALF),
    MelodyNote::new(B3, 3, 1.0, beats::HALF),
    MelodyNote::new(D4, 3, 1.0, beats::HALF),
    MelodyNote::new(A3, 4, 1.0, beats::HALF),
    MelodyNote::new(CS4, 4, 1.0, beats::HALF),
    MelodyNote::new(B3, 5, 1.0, beats::HALF),
    MelodyNote::new(D4, 5, 1.0, beats::HALF),
    MelodyNote::new(A3, 6, 1.0, beats::HALF),
    MelodyNote::new(CS4, 6, 1.0, beats::HALF),
    MelodyNote::new(B3, 7, 1.0, beats::HALF),
    MelodyNote::new(D4, 7, 1.0, beats::HALF),
    MelodyNote::new(A3, 8, 1.0, beats::HALF),
    MelodyNote::new(CS4, 8, 1.0, beats::HALF),
    MelodyNote::new(B3, 9, 1.0, beats::HALF),
    MelodyNote::new(D4, 9, 1.0, beats::HALF),
    MelodyNote::new(B3, 10, 1.0, beats::HALF),
    MelodyNote::new(D4, 10, 1.0, beats::HALF),
    MelodyNote::new(B3, 11, 1.0, beats::HALF),
    MelodyNote::new(D4, 11, 1.0, beats::HALF),
    MelodyNote::new(B3, 12, 1.0, beats::HALF),
    MelodyNote::new(D4, 12, 1.0, beats::HALF),
    MelodyNote::new(B3, 13, 1.0, beats::HALF),
    MelodyNote::new(D4, 13, 1.0, beats::HALF),
    MelodyNote::new(A3, 14, 1.0, beats::HALF),
    MelodyNote::new(CS4, 14, 1.0, beats::HALF),
    MelodyNote::new(B3, 15, 1.0, beats::HALF),
    MelodyNote::new(D4, 15, 1.0, beats::HALF),
    MelodyNote::new(A3, 16, 1.0, beats::HALF),
    MelodyNote::new(CS4, 16, 1.0, beats::HALF),
    MelodyNote::new(B3, 17, 1.0, beats::HALF),
    MelodyNote::new(D4, 17, 1.0, beats::HALF),
    MelodyNote::new(A3, 18, 1.0, beats::HALF),
    MelodyNote::new(CS4, 18, 1.0, beats::HALF),
    MelodyNote::new(B3, 19, 1.0, beats::HALF),
    MelodyNote::new(D4, 19, 1.0, beats::HALF),
    MelodyNote::new(B3, 20, 1.0, beats::HALF),
    MelodyNote::new(D4, 20, 1.0, beats::HALF),
    MelodyNote::new(B3, 21, 1.0, beats::HALF),
    MelodyNote::new(D4, 21, 1.0, beats::HALF),
    MelodyNote::new(A3, 22, 1.0, beats::HALF),
    MelodyNote::new(CS4, 22, 1.0, beats::HALF),
    MelodyNote::new(B3, 23, 1.0, beats::HALF),
    MelodyNote::new(D4, 23, 1.0, beats::HALF),
    MelodyNote::new(A3, 24, 1.0, beats::HALF),
    MelodyNote::new(CS4, 24, 1.0, beats::HALF),
    MelodyNote::new(B3, 25, 1.0, beats::HALF),
    MelodyNote::new(D4, 25, 1.0, beats::HALF),
    MelodyNote::new(A3, 26, 1.0, beats::HALF),
    MelodyNote::new(CS4, 26, 1.0, beats::HALF),
    MelodyNote::new(B3, 27, 1.0, beats::HALF),
    MelodyNote::new(D4, 27, 1.0, beats::HALF),
    MelodyNote::new(A3, 28, 1.0, beats::HALF),
    MelodyNote::new(CS4, 28, 1.0, beats::HALF),
    MelodyNote::new(B3, 29, 1.0, beats::HALF),
    MelodyNote::new(D4, 29, 1.0, beats::HALF),
    MelodyNote::new(A3, 30, 1.0, beats::HALF),
    MelodyNote::new(CS4, 30, 1.0, beats::HALF),
    MelodyNote::new(B3, 31, 1.0, beats::HALF),
    MelodyNote::new(D4, 31, 1.0, beats::HALF),
    MelodyNote::new(A3, 32, 1.0, beats::HALF),
    MelodyNote::new(CS4, 32, 1.0, beats::HALF),
    MelodyNote::new(B3, 33, 1.0, beats::HALF),
    MelodyNote::new(D4, 33, 1.0, beats::HALF),
    MelodyNote::new(A3, 34, 1.0, beats::HALF),
    MelodyNote::new(CS4, 34, 1.0, beats::HALF),
    MelodyNote::new(B3, 35, 1.0, beats::HALF),
    MelodyNote::new(D4, 35, 1.0, beats::HALF),
    MelodyNote::new(A3, 36, 1.0, beats::HALF),
    MelodyNote::new(CS4, 36, 1.0, beats::HALF),
    MelodyNote::new(B3, 37, 1.0, beats::HALF),
    MelodyNote::new(D4, 37, 1.0, beats::HALF),
    MelodyNote::new(A3, 38, 1.0, beats::HALF),
    MelodyNote::new(CS4, 38, 1.0, beats::HALF),
    MelodyNote::new(B3, 39, 1.0, beats::HALF),
    MelodyNote::new(D4, 39, 1.0, beats::HALF),
    MelodyNote::new(A3, 40, 1.0, beats::HALF),
    MelodyNote::new(CS4, 40, 1.0, beats::HALF),
    MelodyNote::new(B3, 41, 1.0, beats::HALF),
    MelodyNote::new(D4, 41, 1.0, beats::HALF),
];

const LINE: MelodyParams = MelodyParams {
    beat_seconds: BEAT_SECONDS,
    beats_per_bar: 3.0,
    loop_beats: LOOP_BEATS,
    transpose_semitones: 0.0,
    harmonics: SINE,
    attack: 0.15,
    release: 0.08,
    body: EnvelopeBody::Decay { time_constant: 4.5 },
    vibrato_rate: 4.0,
    vibrato_depth: 0.0,
    gain: 0.28,
    taper: None,
};

const MELODY: MelodyParams = MelodyParams {
    taper: Some(HighNoteTaper {
        threshold_hz: 600.0,
        ceiling_hz: E6,
        amount: 0.35,
    }),
    ..LINE
};

const BASS: MelodyParams = MelodyParams {
    attack: 0.2,
    body: EnvelopeBody::Decay { time_constant: 3.5 },
    gain: 0.16,
    ..LINE
};

/// Two notes sound together, so each gets half the line's gain.
const CHORDS: MelodyParams = MelodyParams {
    attack: 0.08,
    body: EnvelopeBody::Decay { time_constant: 2.5 },
    gain: 0.03,
    ..LINE
};

pub(super) static MOONLIT_GYMNOPEDIE_V1: Preset = Preset {
    id: "moonlit_gymnopedie_v1",
    family: "moonlit_gymnopedie",
    version: 1,
    title: "Moonlit Gymnopédie",
    layers: &[
        LayerDef {
            name: "bass",
            source: SourceSpec::Melody {
                params: BASS,
                notes: BASS_NOTES,
            },
            filters: &[],
            amplitude: AmplitudeSpec::Constant(1.0),
            gain: 1.6,
        },
        LayerDef {
            name: "chords",
            source: SourceSpec::Melody {
                params: CHORDS,
                notes: CHORD_NOTES,
            },
            filters: &[],
            amplitude: AmplitudeSpec::Constant(1.0),
            gain: 1.6,
        },
        LayerDef {
            name: "melody",
            source: SourceSpec::Melody {
                params: MELODY,
                notes: MELODY_NOTES,
            },
            filters: &[],
            amplitude: AmplitudeSpec::Constant(1.0),
            gain: 1.6,
        },
    ],
    filter: None,
    reverb: Some(ReverbParams {
        room_size: 2.2,
        damping: 0.4,
        decay: 0.85,
        mix: 0.45,
        predelay: 0.03,
    }),
    limiter: DEFAULT_LIMITER,
};
