pub mod config;
pub mod dsp;
pub mod engine; // Final mixer and host-facing control/render handles
pub mod error;
pub mod graph; // Composable signal nodes
pub mod presets; // Versioned preset catalog and builder

pub use config::EngineConfig;
pub use engine::{AmbientEngine, EngineController, EngineRenderer, PlaybackState};
pub use error::{ConfigError, EngineError};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
