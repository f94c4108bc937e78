//! Gain ramps for fade-in, fade-out and crossfades.
//!
//! A [`Fade`] moves a gain from `from` to `to` over a fixed number of
//! samples. The ramp is monotonic: gain never passes `to` and never moves
//! back toward `from`. After the last step the gain is exactly `to`.
//!
//! ```text
//! linear       from + (to - from) · p
//! equal power  rising:  from + (to - from) · sin(p·π/2)
//!              falling: from + (to - from) · (1 - cos(p·π/2))
//! ```
//!
//! Equal-power curves keep the summed power of two crossfading sources
//! roughly constant, which avoids the dip in loudness a linear crossfade has
//! at its midpoint.

use std::f32::consts::FRAC_PI_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeCurve {
    #[default]
    Linear,
    EqualPower,
}

impl FadeCurve {
    /// Shape progress `p ∈ [0, 1]` for a ramp in the given direction.
    #[inline]
    fn shape(self, p: f32, rising: bool) -> f32 {
        match self {
            FadeCurve::Linear => p,
            FadeCurve::EqualPower if rising => (p * FRAC_PI_2).sin(),
            FadeCurve::EqualPower => 1.0 - (p * FRAC_PI_2).cos(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    total: u32,
    elapsed: u32,
    curve: FadeCurve,
}

impl Fade {
    /// Ramp from `from` to `to` over `samples` samples. Zero samples jumps
    /// straight to `to`.
    pub fn new(from: f32, to: f32, samples: u32, curve: FadeCurve) -> Self {
        Self {
            from,
            to,
            total: samples,
            elapsed: 0,
            curve,
        }
    }

    /// A finished ramp holding `gain`.
    pub fn constant(gain: f32) -> Self {
        Self::new(gain, gain, 0, FadeCurve::Linear)
    }

    /// Gain at the current position without advancing.
    #[inline]
    pub fn current(&self) -> f32 {
        if self.elapsed >= self.total {
            return self.to;
        }
        let p = self.elapsed as f32 / self.total as f32;
        let shaped = self.curve.shape(p, self.to >= self.from);
        let gain = self.from + (self.to - self.from) * shaped;

        // Rounding must not carry the gain past the target.
        if self.to >= self.from {
            gain.min(self.to)
        } else {
            gain.max(self.to)
        }
    }

    /// Advance one sample and return the gain for it.
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        if self.elapsed < self.total {
            self.elapsed += 1;
        }
        self.current()
    }

    /// Skip `samples` samples.
    pub fn advance(&mut self, samples: u32) {
        self.elapsed = self.elapsed.saturating_add(samples).min(self.total);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn remaining(&self) -> u32 {
        self.total - self.elapsed
    }

    pub fn curve(&self) -> FadeCurve {
        self.curve
    }
}

impl Default for Fade {
    fn default() -> Self {
        Self::constant(1.0)
    }
}
