//! Seeded noise sources.
//!
//! Every source owns its generator and remembers its seed, so two sources
//! built with the same seed emit identical streams and `reset()` replays the
//! stream from the start. Presets document their seeds; changing one changes
//! the sound and therefore requires a new preset id.
//!
//! # Colours
//!
//! ```text
//! white   independent uniform samples in [-1, 1]           flat spectrum
//! pink    Voss-McCartney: sum of octave-spaced held rows   -3 dB/octave
//! brown   leaky integrator of white noise                  -6 dB/octave
//! ```
//!
//! Pink noise keeps `PINK_ROWS` random rows. Row `r` is refreshed every
//! `2^r` samples; which row to refresh is the number of trailing zeros of a
//! running counter, so exactly one row changes per sample and the running sum
//! is updated in O(1).
//!
//! Noise is generated per sample and ignores `dt`: its spectrum is defined
//! relative to the sample rate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::{rngs::StdRng, Rng, SeedableRng};

const PINK_ROWS: usize = 16;
/// Brown noise integrator: `b = (b + STEP·white) / (1 + STEP)`.
const BROWN_STEP: f32 = 0.02;
/// Brings brown noise up to roughly unit peak level.
const BROWN_GAIN: f32 = 3.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

pub struct NoiseSource {
    color: NoiseColor,
    seed: u64,
    rng: StdRng,
    pink_rows: [f32; PINK_ROWS],
    pink_sum: f32,
    counter: u32,
    brown: f32,
}

impl NoiseSource {
    pub fn new(color: NoiseColor, seed: u64) -> Self {
        let mut source = Self {
            color,
            seed,
            rng: StdRng::seed_from_u64(seed),
            pink_rows: [0.0; PINK_ROWS],
            pink_sum: 0.0,
            counter: 0,
            brown: 0.0,
        };
        source.prime();
        source
    }

    pub fn white(seed: u64) -> Self {
        Self::new(NoiseColor::White, seed)
    }

    pub fn pink(seed: u64) -> Self {
        Self::new(NoiseColor::Pink, seed)
    }

    pub fn brown(seed: u64) -> Self {
        Self::new(NoiseColor::Brown, seed)
    }

    /// Fill the pink rows so the first samples already have full density.
    fn prime(&mut self) {
        if self.color == NoiseColor::Pink {
            for row in self.pink_rows.iter_mut() {
                *row = self.rng.gen_range(-1.0..=1.0);
            }
            self.pink_sum = self.pink_rows.iter().sum();
        }
    }

    #[inline]
    fn white_sample(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.color {
            NoiseColor::White => self.white_sample(),
            NoiseColor::Pink => {
                self.counter = self.counter.wrapping_add(1);
                let row = (self.counter.trailing_zeros() as usize).min(PINK_ROWS - 1);
                let fresh = self.white_sample();
                self.pink_sum += fresh - self.pink_rows[row];
                self.pink_rows[row] = fresh;

                // One extra white sample fills in the top octave.
                let white = self.white_sample();
                (self.pink_sum + white) / (PINK_ROWS + 1) as f32
            }
            NoiseColor::Brown => {
                let white = self.white_sample();
                self.brown = (self.brown + BROWN_STEP * white) / (1.0 + BROWN_STEP);
                self.brown * BROWN_GAIN
            }
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn color(&self) -> NoiseColor {
        self.color
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from its seed.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.pink_rows = [0.0; PINK_ROWS];
        self.pink_sum = 0.0;
        self.counter = 0;
        self.brown = 0.0;
        self.prime();
    }
}
