//! Session configuration negotiated with the host before rendering begins.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, MAX_BLOCK_SIZE};

const MIN_SAMPLE_RATE: f32 = 8_000.0;
const MAX_SAMPLE_RATE: f32 = 384_000.0;
const MAX_FRAME_COUNT: usize = MAX_BLOCK_SIZE * 8;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Largest frame count the host will ask for in a single callback.
    pub max_frame_count: usize,
    /// Fade applied by `start()` / `resume()`.
    pub fade_in_ms: f32,
    /// Fade applied by `stop()` / `pause()` before the render path goes idle.
    pub stop_fade_ms: f32,
    /// Crossfade used when a preset is loaded while another one is playing.
    pub crossfade_ms: f32,
    /// Capacity of the control → render command queue.
    pub command_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_frame_count: 512,
            fade_in_ms: 1_500.0,
            stop_fade_ms: 2_000.0,
            crossfade_ms: 1_500.0,
            command_capacity: 64,
        }
    }
}

impl EngineConfig {
    pub fn new(sample_rate: f32, max_frame_count: usize) -> Self {
        Self {
            sample_rate,
            max_frame_count,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sample_rate(self.sample_rate)?;

        if self.max_frame_count == 0 || self.max_frame_count > MAX_FRAME_COUNT {
            return Err(ConfigError::InvalidFrameCount(self.max_frame_count));
        }

        for (name, value) in [
            ("fade_in_ms", self.fade_in_ms),
            ("stop_fade_ms", self.stop_fade_ms),
            ("crossfade_ms", self.crossfade_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        if self.command_capacity < 4 {
            return Err(ConfigError::InvalidParameter {
                name: "command_capacity",
                value: self.command_capacity as f32,
            });
        }

        Ok(())
    }

    /// Convert a duration in milliseconds to a whole number of samples.
    pub fn ms_to_samples(&self, ms: f32) -> u32 {
        ms_to_samples(ms, self.sample_rate)
    }
}

pub(crate) fn validate_sample_rate(sample_rate: f32) -> Result<f32, ConfigError> {
    if sample_rate.is_finite() && (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        Ok(sample_rate)
    } else {
        Err(ConfigError::InvalidSampleRate(sample_rate))
    }
}

pub(crate) fn ms_to_samples(ms: f32, sample_rate: f32) -> u32 {
    (ms.max(0.0) * 0.001 * sample_rate).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_sample_rates() {
        for rate in [0.0, -48_000.0, f32::NAN, f32::INFINITY, 1_000_000.0] {
            let config = EngineConfig::new(rate, 512);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidSampleRate(_))),
                "sample rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_zero_frames() {
        let config = EngineConfig::new(48_000.0, 0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidFrameCount(0)));
    }

    #[test]
    fn converts_milliseconds_to_samples() {
        let config = EngineConfig::default();
        assert_eq!(config.ms_to_samples(1_000.0), 48_000);
        assert_eq!(config.ms_to_samples(-5.0), 0);
    }
}
