//! Error types surfaced to the control thread.
//!
//! Nothing in here is ever produced on the render path. Invalid values that
//! could reach the render path are either rejected at construction time
//! (returning one of these errors) or clamped once while configuring.

use thiserror::Error;

/// Invalid configuration detected synchronously at call time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("invalid sample rate {0} Hz (expected 8000..=384000)")]
    InvalidSampleRate(f32),

    #[error("invalid max frame count {0} (expected 1..={max})", max = crate::MAX_BLOCK_SIZE * 8)]
    InvalidFrameCount(usize),

    #[error("invalid frequency {0} Hz (must be finite and non-negative)")]
    InvalidFrequency(f32),

    #[error("invalid value {value} for parameter '{name}'")]
    InvalidParameter { name: &'static str, value: f32 },
}

/// Errors returned by [`EngineController`](crate::EngineController) calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The render thread has not drained enough commands yet. Nothing was
    /// applied; the caller may retry after the next render callback.
    #[error("command queue is full")]
    CommandQueueFull,

    #[error("no preset has been loaded")]
    NoPresetLoaded,
}

/// Reject a parameter that is not a finite number.
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_engine_error() {
        let err: EngineError = ConfigError::UnknownPreset("nope".into()).into();
        assert_eq!(err.to_string(), "unknown preset 'nope'");
    }

    #[test]
    fn ensure_finite_rejects_nan() {
        assert!(ensure_finite("gain", f32::NAN).is_err());
        assert_eq!(ensure_finite("gain", 0.5), Ok(0.5));
    }
}
