//! Stateless tanh peak limiter.
//!
//! ```text
//! driven     = x · drive
//! limited    = tanh(driven)
//! normalized = limited / tanh(drive)
//! output     = clamp(normalized, -ceiling, +ceiling)
//! ```
//!
//! Dividing by `tanh(drive)` maps an input of ±1.0 back to ±1.0, so quiet
//! material passes at close to unity gain while peaks are rounded off
//! instead of clipped. The final clamp is the last guard on the output: for
//! any finite input the result is within `±ceiling`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ConfigError};

pub const MIN_DRIVE: f32 = 0.1;
pub const MAX_DRIVE: f32 = 10.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterParams {
    pub drive: f32,
    pub ceiling: f32,
}

impl Default for LimiterParams {
    fn default() -> Self {
        Self {
            drive: 1.2,
            ceiling: 0.95,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SoftLimiter {
    drive: f32,
    ceiling: f32,
    norm: f32,
}

impl SoftLimiter {
    pub fn new(params: LimiterParams) -> Result<Self, ConfigError> {
        let drive = ensure_finite("limiter_drive", params.drive)?.clamp(MIN_DRIVE, MAX_DRIVE);
        let ceiling = ensure_finite("limiter_ceiling", params.ceiling)?;
        if ceiling <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "limiter_ceiling",
                value: ceiling,
            });
        }

        Ok(Self {
            drive,
            ceiling: ceiling.min(1.0),
            norm: 1.0 / drive.tanh(),
        })
    }

    #[inline]
    pub fn process(&self, input: f32) -> f32 {
        let normalized = (input * self.drive).tanh() * self.norm;
        normalized.clamp(-self.ceiling, self.ceiling)
    }

    pub fn render(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }
}

impl Default for SoftLimiter {
    fn default() -> Self {
        let LimiterParams { drive, ceiling } = LimiterParams::default();
        Self {
            drive,
            ceiling,
            norm: 1.0 / drive.tanh(),
        }
    }
}
