//! Cathedral stillness: an organ drone under the Jupiter hymn tune with a
//! few distant tree chimes, all in a large stone room.
//!
//! # Layers
//!
//! - **Drone**: C3 and G3, each with four organ harmonics, breathing
//!   between 0.4 and 0.8 over a 50 s cycle.
//! - **Melody**: the Jupiter hymn in 3/4 at 60 BPM (25 bars, 75 s loop),
//!   transposed down a whole tone. Breaths shorten a note so repeated
//!   pitches re-articulate. Notes above 600 Hz are tapered so the top of
//!   the tune doesn't shout over the drone.
//! - **Chimes**: sparse at first, busier towards the climax of the loop.
//!
//! The reverb is long (room 2.2, decay 0.88) and fairly wet.

use super::{AmplitudeSpec, LayerDef, LfoSpec, Preset, SourceSpec, DEFAULT_LIMITER};
use crate::{
    dsp::{envelope::EnvelopeBody, reverb::ReverbParams},
    graph::{
        chime::{ChimeParams, ChimeStrike},
        melody::{beats, breath, HighNoteTaper, MelodyNote, MelodyParams},
        partials::{Fundamental, Harmonic},
    },
};

const E4: f32 = 329.63;
const G4: f32 = 392.00;
const A4: f32 = 440.00;
const B4: f32 = 493.88;
const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const G5: f32 = 783.99;
const A5: f32 = 880.00;
const B5: f32 = 987.77;
const C6: f32 = 1046.50;
const D6: f32 = 1174.66;
const E6: f32 = 1318.51;

const DRONE_FUNDAMENTALS: &[Fundamental] = &[
    Fundamental::new(130.81, 0.5), // C3
    Fundamental::new(196.00, 0.35), // G3
];

const DRONE_HARMONICS: &[Harmonic] = &[
    Harmonic::new(1.0, 0.9),
    Harmonic::new(2.0, 0.4),
    Harmonic::new(3.0, 0.25),
    Harmonic::new(4.0, 0.15),
];

const ORGAN_HARMONICS: &[Harmonic] = &[
    Harmonic::new(1.0, 1.0),
    Harmonic::new(2.0, 0.45),
    Harmonic::new(3.0, 0.25),
    Harmonic::new(4.0, 0.12),
    Harmonic::new(6.0, 0.03),
];

const JUPITER: &[MelodyNote] = &[
    // Bar 1: rest, E-G (eighth + eighth)
    MelodyNote::new(E4, 1, 2.0, beats::EIGHTH),
    MelodyNote::new(G4, 1, 2.5, beats::EIGHTH),

    // Bar 2: A(quarter) A-C-B.-G
    MelodyNote::breathed(A4, 2, 0.0, beats::QUARTER, breath::SHORT),
    MelodyNote::new(A4, 2, 1.0, beats::EIGHTH),
    MelodyNote::new(C5, 2, 1.5, beats::EIGHTH),
    MelodyNote::new(B4, 2, 2.0, beats::DOTTED_EIGHTH),
    MelodyNote::new(G4, 2, 2.75, beats::SIXTEENTH),

    // Bar 3: C-D-C B
    MelodyNote::new(C5, 3, 0.0, beats::EIGHTH),
    MelodyNote::new(D5, 3, 0.5, beats::EIGHTH),
    MelodyNote::new(C5, 3, 1.0, beats::QUARTER),
    MelodyNote::new(B4, 3, 2.0, beats::QUARTER),

    // Bar 4: A-B-A G
    MelodyNote::new(A4, 4, 0.0, beats::EIGHTH),
    MelodyNote::new(B4, 4, 0.5, beats::EIGHTH),
    MelodyNote::new(A4, 4, 1.0, beats::QUARTER),
    MelodyNote::new(G4, 4, 2.0, beats::QUARTER),

    // Bar 5: E(half) E-G
    MelodyNote::breathed(E4, 5, 0.0, beats::HALF, breath::LONG),
    MelodyNote::new(E4, 5, 2.0, beats::EIGHTH),
    MelodyNote::new(G4, 5, 2.5, beats::EIGHTH),

    // Bar 6: A A-C-B.-G
    MelodyNote::breathed(A4, 6, 0.0, beats::QUARTER, breath::LONG),
    MelodyNote::new(A4, 6, 1.0, beats::EIGHTH),
    MelodyNote::new(C5, 6, 1.5, beats::EIGHTH),
    MelodyNote::new(B4, 6, 2.0, beats::DOTTED_EIGHTH),
    MelodyNote::new(G4, 6, 2.75, beats::SIXTEENTH),

    // Bar 7: C-D E E
    MelodyNote::new(C5, 7, 0.0, beats::EIGHTH),
    MelodyNote::new(D5, 7, 0.5, beats::EIGHTH),
    MelodyNote::breathed(E5, 7, 1.0, beats::QUARTER, breath::SHORT),
    MelodyNote::breathed(E5, 7, 2.0, beats::QUARTER, breath::SHORT),

    // Bar 8: E-D-C D
    MelodyNote::new(E5, 8, 0.0, beats::EIGHTH),
    MelodyNote::new(D5, 8, 0.5, beats::EIGHTH),
    MelodyNote::new(C5, 8, 1.0, beats::QUARTER),
    MelodyNote::new(D5, 8, 2.0, beats::QUARTER),

    // Bar 9: C(half) G-E
    MelodyNote::breathed(C5, 9, 0.0, beats::HALF, breath::LONG),
    MelodyNote::new(G5, 9, 2.0, beats::EIGHTH),
    MelodyNote::new(E5, 9, 2.5, beats::EIGHTH),

    // Bar 10: D D C-E
    MelodyNote::breathed(D5, 10, 0.0, beats::QUARTER, breath::SHORT),
    MelodyNote::new(D5, 10, 1.0, beats::QUARTER),
    MelodyNote::new(C5, 10, 2.0, beats::EIGHTH),
    MelodyNote::new(E5, 10, 2.5, beats::EIGHTH),

    // Bar 11: D G G-E
    MelodyNote::new(D5, 11, 0.0, beats::QUARTER),
    MelodyNote::breathed(G4, 11, 1.0, beats::QUARTER, breath::SHORT),
    MelodyNote::new(G5, 11, 2.0, beats::EIGHTH),
    MelodyNote::new(E5, 11, 2.5, beats::EIGHTH),

    // Bar 12: D D E-G
    MelodyNote::breathed(D5, 12, 0.0, beats::QUARTER, breath::SHORT),
    MelodyNote::new(D5, 12, 1.0, beats::QUARTER),
    MelodyNote::new(E5, 12, 2.0, beats::EIGHTH),
    MelodyNote::breathed(G5, 12, 2.5, beats::EIGHTH, breath::SHORT),

    // Bar 13: A(half) A-B
    MelodyNote::breathed(A5, 13, 0.0, beats::HALF, breath::LONG),
    MelodyNote::new(A5, 13, 2.0, beats::EIGHTH),
    MelodyNote::new(B5, 13, 2.5, beats::EIGHTH),

    // Bar 14: C B A
    MelodyNote::new(C6, 14, 0.0, beats::QUARTER),
    MelodyNote::new(B5, 14, 1.0, beats::QUARTER),
    MelodyNote::new(A5, 14, 2.0, beats::QUARTER),

    // Bar 15: G C E
    MelodyNote::new(G5, 15, 0.0, beats::QUARTER),
    MelodyNote::new(C6, 15, 1.0, beats::QUARTER),
    MelodyNote::new(E5, 15, 2.0, beats::QUARTER),

    // Bar 16: D-C D E
    MelodyNote::new(D5, 16, 0.0, beats::EIGHTH),
    MelodyNote::new(C5, 16, 0.5, beats::EIGHTH),
    MelodyNote::new(D5, 16, 1.0, beats::QUARTER),
    MelodyNote::new(E5, 16, 2.0, beats::QUARTER),

    // Bar 17: G(half) E-G
    MelodyNote::breathed(G5, 17, 0.0, beats::HALF, breath::LONG),
    MelodyNote::new(E5, 17, 2.0, beats::EIGHTH),
    MelodyNote::breathed(G5, 17, 2.5, beats::EIGHTH, breath::SHORT),

    // Bar 18: A A-C-B.-G
    MelodyNote::breathed(A5, 18, 0.0, beats::QUARTER, breath::SHORT),
    MelodyNote::new(A5, 18, 1.0, beats::EIGHTH),
    MelodyNote::new(C6, 18, 1.5, beats::EIGHTH),
    MelodyNote::new(B5, 18, 2.0, beats::DOTTED_EIGHTH),
    MelodyNote::new(G5, 18, 2.75, beats::SIXTEENTH),

    // Bar 19: C-D C B
    MelodyNote::new(C6, 19, 0.0, beats::EIGHTH),
    MelodyNote::new(D6, 19, 0.5, beats::EIGHTH),
    MelodyNote::breathed(C6, 19, 1.0, beats::QUARTER, breath::SHORT),
    MelodyNote::new(B5, 19, 2.0, beats::QUARTER),

    // Bar 20: A-B-A G
    MelodyNote::new(A5, 20, 0.0, beats::EIGHTH),
    MelodyNote::new(B5, 20, 0.5, beats::EIGHTH),
    MelodyNote::new(A5, 20, 1.0, beats::QUARTER),
    MelodyNote::new(G5, 20, 2.0, beats::QUARTER),

    // Bar 21: E(half) E-G
    MelodyNote::breathed(E5, 21, 0.0, beats::HALF, breath::LONG),
    MelodyNote::new(E5, 21, 2.0, beats::EIGHTH),
    MelodyNote::breathed(G5, 21, 2.5, beats::EIGHTH, breath::SHORT),

    // Bar 22: A A-C-B.-G
    MelodyNote::breathed(A5, 22, 0.0, beats::QUARTER, breath::SHORT),
    MelodyNote::new(A5, 22, 1.0, beats::EIGHTH),
    MelodyNote::new(C6, 22, 1.5, beats::EIGHTH),
    MelodyNote::new(B5, 22, 2.0, beats::DOTTED_EIGHTH),
    MelodyNote::breathed(G5, 22, 2.75, beats::SIXTEENTH, breath::SHORT),

    // Bar 23: C-D E E
    MelodyNote::new(C6, 23, 0.0, beats::EIGHTH),
    MelodyNote::new(D6, 23, 0.5, beats::EIGHTH),
    MelodyNote::breathed(E6, 23, 1.0, beats::QUARTER, breath::SHORT),
    MelodyNote::breathed(E6, 23, 2.0, beats::QUARTER, breath::SHORT),

    // Bar 24: E-D-C D
    MelodyNote::new(E6, 24, 0.0, beats::EIGHTH),
    MelodyNote::new(D6, 24, 0.5, beats::EIGHTH),
    MelodyNote::new(C6, 24, 1.0, beats::QUARTER),
    MelodyNote::new(D6, 24, 2.0, beats::QUARTER),

    // Bar 25: C (dotted half = ending)
    MelodyNote::new(C6, 25, 0.0, beats::DOTTED_HALF),
];

const MELODY: MelodyParams = MelodyParams {
    beat_seconds: 1.0,
    beats_per_bar: 3.0,
    loop_beats: 75.0,
    transpose_semitones: -2.0,
    harmonics: ORGAN_HARMONICS,
    attack: 0.15,
    release: 0.18,
    body: EnvelopeBody::Sustain,
    vibrato_rate: 4.0,
    vibrato_depth: 0.001,
    gain: 0.22,
    taper: Some(HighNoteTaper {
        threshold_hz: 600.0,
        ceiling_hz: C6,
        amount: 0.35,
    }),
};

const CHIME_STRIKES: &[ChimeStrike] = &[
    ChimeStrike::new(15.0, 0.1),
    ChimeStrike::new(25.0, 0.6),
    ChimeStrike::new(30.0, 0.6),
    ChimeStrike::new(38.0, 0.8),
    ChimeStrike::new(48.0, 0.8),
    ChimeStrike::new(55.0, 0.8),
    ChimeStrike::new(62.0, 1.0),
    ChimeStrike::new(68.0, 1.0),
];

const CHIMES: ChimeParams = ChimeParams {
    grains: 24,
    cascade: 0.02,
    grain_decay: 1.2,
    base_hz: 6_000.0,
    detune_hz: 3.0,
    gain: 0.03,
    seed: 42,
    cycle_seconds: 75.0,
    strikes: CHIME_STRIKES,
};

pub(super) static CATHEDRAL_STILLNESS_V1: Preset = Preset {
    id: "cathedral_stillness_v1",
    family: "cathedral_stillness",
    version: 1,
    title: "Cathedral Stillness",
    layers: &[
        LayerDef {
            name: "drone",
            source: SourceSpec::Drone {
                fundamentals: DRONE_FUNDAMENTALS,
                harmonics: DRONE_HARMONICS,
            },
            filters: &[],
            amplitude: AmplitudeSpec::Lfo(LfoSpec::sine(0.02, 0.4, 0.8)),
            gain: 0.12,
        },
        LayerDef {
            name: "melody",
            source: SourceSpec::Melody {
                params: MELODY,
                notes: JUPITER,
            },
            filters: &[],
            amplitude: AmplitudeSpec::Constant(1.0),
            gain: 0.7,
        },
        LayerDef {
            name: "chimes",
            source: SourceSpec::Chime(CHIMES),
            filters: &[],
            amplitude: AmplitudeSpec::Constant(1.0),
            gain: 0.8,
        },
    ],
    filter: None,
    reverb: Some(ReverbParams {
        room_size: 2.2,
        damping: 0.35,
        decay: 0.88,
        mix: 0.55,
        predelay: 0.04,
    }),
    limiter: DEFAULT_LIMITER,
};
