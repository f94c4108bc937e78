//! Host boundary: the final mixer plus the control/render handle pair.
//!
//! [`AmbientEngine::configure`] splits the engine into two halves that are
//! meant to live on different threads:
//!
//! - [`EngineController`] on the UI/main thread: loads presets, runs the
//!   playback state machine, logs.
//! - [`EngineRenderer`] inside the audio callback: drains commands and
//!   renders. Lock-free and allocation-free.
//!
//! They share nothing but two `rtrb` ring buffers, one carrying commands
//! (including freshly built mixers) to the renderer and one carrying retired
//! mixers back so they are freed off the audio thread.
//!
//! ```ignore
//! let (mut control, mut render) = AmbientEngine::configure(48_000.0, 512)?;
//! control.load_preset("rain_v1")?;
//! control.start()?;
//!
//! // audio thread
//! render.render(&mut buffer);
//!
//! // UI tick
//! control.poll();
//! ```

pub mod command;
pub mod controller;
pub mod mixer;
pub mod renderer;

use rtrb::RingBuffer;

use crate::{config::EngineConfig, error::ConfigError};

pub use controller::EngineController;
pub use renderer::EngineRenderer;

use self::{command::EngineCommand, mixer::FinalMixer};

/// Lifecycle as seen from the control thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    /// Fading out; the mixer is kept for `resume`.
    Pausing,
    Paused,
    /// Fading out; the mixer is released when the fade ends.
    Stopping,
}

pub struct AmbientEngine;

impl AmbientEngine {
    /// Create an engine for `sample_rate` with default fades and queue size.
    pub fn configure(
        sample_rate: f32,
        max_frame_count: usize,
    ) -> Result<(EngineController, EngineRenderer), ConfigError> {
        Self::new(EngineConfig::new(sample_rate, max_frame_count))
    }

    pub fn new(config: EngineConfig) -> Result<(EngineController, EngineRenderer), ConfigError> {
        config.validate()?;

        let (command_tx, command_rx) = RingBuffer::<EngineCommand>::new(config.command_capacity);
        let (retired_tx, retired_rx) = RingBuffer::<Box<FinalMixer>>::new(config.command_capacity);

        let renderer = EngineRenderer::new(
            config.sample_rate,
            config.max_frame_count,
            command_rx,
            retired_tx,
        );
        let controller = EngineController::new(config, command_tx, retired_rx);
        Ok((controller, renderer))
    }
}
