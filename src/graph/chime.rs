use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::Serialize;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    dsp::oscillator::{validate_frequency, Oscillator},
    error::{ensure_finite, ConfigError},
    graph::node::Signal,
};

/*
Tree Chime
==========

A cascade of short metallic grains, like a hand brushed across a row of
wind-chime rods. Every strike starts `grains` sine partials one after the
other, `cascade` seconds apart, climbing in pitch:

  freq_i = base × (0.8 + 0.5 × i / (grains - 1)) + detune_i

  grain  0 ─╮▁▁▁▁▁▁▁
  grain  1 ──╮▁▁▁▁▁▁
  grain  2 ───╮▁▁▁▁▁      each grain: sin(phase_i) × level × exp(-t / grain_decay)
     ...
  grain 23 ─────────╮▁

Each strike draws fresh detune (±detune_hz / 2) and start phases from the
node's seeded generator, so no two strikes ring identically but a given seed
always replays the same sequence.

Strikes come from a schedule that repeats every `cycle_seconds`. A grain
stops once its level falls under `SILENCE`.

Overlapping Strikes
-------------------

A new strike must not cut the tail of the previous one. Grains live in
`BANKS` banks and strikes take them in turn, so a strike only reuses the
bank of the strike `BANKS` before it, which has long since died away:

  strike 1 → bank 0   ╮▁▁▁▁▁▁▁▁▁▁▁
  strike 2 → bank 1         ╮▁▁▁▁▁▁▁▁▁▁▁      tails add up
  strike 3 → bank 2               ╮▁▁▁▁▁▁▁▁
  strike 4 → bank 0 (strike 1 is silent by now)
*/

/// Grains below this level are dropped.
const SILENCE: f32 = 1.0e-3;
/// Strikes that can ring at the same time.
const BANKS: usize = 3;
pub const MAX_GRAINS: usize = 64;

/// One strike of the chime, `at` seconds into the cycle.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeStrike {
    pub at: f32,
    pub level: f32,
}

impl ChimeStrike {
    pub const fn new(at: f32, level: f32) -> Self {
        Self { at, level }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeParams {
    pub grains: usize,
    /// Seconds between consecutive grain onsets.
    pub cascade: f32,
    /// Decay time constant of each grain, in seconds.
    pub grain_decay: f32,
    pub base_hz: f32,
    pub detune_hz: f32,
    pub gain: f32,
    pub seed: u64,
    pub cycle_seconds: f32,
    pub strikes: &'static [ChimeStrike],
}

#[derive(Debug, Clone)]
struct Grain {
    osc: Oscillator,
    pitch: f32,
    delay: f32,
    level: f32,
}

pub struct ChimeNode {
    /// `BANKS` banks of `grains_per_strike` grains each.
    grains: Box<[Grain]>,
    grains_per_strike: usize,
    next_bank: usize,
    strikes: Box<[ChimeStrike]>,
    cascade: f32,
    grain_decay: f32,
    detune_hz: f32,
    scale: f32,
    seed: u64,
    rng: StdRng,
    cycle_seconds: f64,
    position: f64,
    next_strike: usize,
}

impl ChimeNode {
    pub fn new(params: &ChimeParams) -> Result<Self, ConfigError> {
        if params.grains == 0 || params.grains > MAX_GRAINS {
            return Err(ConfigError::InvalidParameter {
                name: "grains",
                value: params.grains as f32,
            });
        }
        let cycle_seconds = ensure_finite("cycle_seconds", params.cycle_seconds)?;
        if cycle_seconds <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "cycle_seconds",
                value: cycle_seconds,
            });
        }

        let base_hz = validate_frequency(params.base_hz)?;
        let detune_hz = ensure_finite("detune_hz", params.detune_hz)?.abs();
        let span = (params.grains - 1).max(1) as f32;

        let mut grains = Vec::with_capacity(params.grains * BANKS);
        for _ in 0..BANKS {
            for i in 0..params.grains {
                let pitch = base_hz * (0.8 + 0.5 * i as f32 / span);
                validate_frequency(pitch - detune_hz * 0.5)?;
                grains.push(Grain {
                    osc: Oscillator::sine(pitch)?,
                    pitch,
                    delay: 0.0,
                    level: 0.0,
                });
            }
        }

        let mut strikes = Vec::with_capacity(params.strikes.len());
        for strike in params.strikes {
            let at = ensure_finite("strike_at", strike.at)?;
            if at < 0.0 || at >= cycle_seconds {
                return Err(ConfigError::InvalidParameter {
                    name: "strike_at",
                    value: at,
                });
            }
            strikes.push(ChimeStrike::new(at, ensure_finite("strike_level", strike.level)?));
        }
        strikes.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(Self {
            grains: grains.into_boxed_slice(),
            grains_per_strike: params.grains,
            next_bank: 0,
            strikes: strikes.into_boxed_slice(),
            cascade: ensure_finite("cascade", params.cascade)?.max(0.0),
            grain_decay: ensure_finite("grain_decay", params.grain_decay)?.max(crate::MIN_TIME),
            detune_hz,
            scale: ensure_finite("gain", params.gain)? / params.grains as f32,
            seed: params.seed,
            rng: StdRng::seed_from_u64(params.seed),
            cycle_seconds: cycle_seconds as f64,
            position: 0.0,
            next_strike: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn strike(&mut self, level: f32) {
        let start = self.next_bank * self.grains_per_strike;
        self.next_bank = (self.next_bank + 1) % BANKS;

        let bank = &mut self.grains[start..start + self.grains_per_strike];
        for (i, grain) in bank.iter_mut().enumerate() {
            let detune = (self.rng.gen::<f32>() - 0.5) * self.detune_hz;
            let phase = self.rng.gen::<f64>() * TAU;

            let mut osc = grain.osc.clone().with_phase(phase);
            osc.set_frequency(grain.pitch + detune);
            grain.osc = osc;
            grain.delay = i as f32 * self.cascade;
            grain.level = level;
        }
    }
}

impl Signal for ChimeNode {
    fn next_sample(&mut self, dt: f32) -> f32 {
        while let Some(strike) = self.strikes.get(self.next_strike) {
            if (strike.at as f64) > self.position {
                break;
            }
            let level = strike.level;
            self.next_strike += 1;
            self.strike(level);
        }

        let dt = dt.max(0.0);
        let falloff = (-dt / self.grain_decay).exp();
        let mut value = 0.0;

        for grain in self.grains.iter_mut() {
            if grain.level < SILENCE {
                continue;
            }
            if grain.delay > 0.0 {
                grain.delay -= dt;
                continue;
            }
            value += grain.osc.next_sample(dt) * grain.level;
            grain.level *= falloff;
        }

        self.position += dt as f64;
        if self.position >= self.cycle_seconds {
            self.position -= self.cycle_seconds;
            self.next_strike = 0;
        }

        value * self.scale
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.position = 0.0;
        self.next_strike = 0;
        self.next_bank = 0;
        for grain in self.grains.iter_mut() {
            grain.level = 0.0;
            grain.delay = 0.0;
        }
    }
}
