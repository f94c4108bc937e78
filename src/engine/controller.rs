//! The control-thread half of the engine.
//!
//! `EngineController` owns the playback state machine and everything that
//! may allocate or log: building mixers, scheduling the second phase of a
//! stop or pause, and dropping mixers the renderer has retired. It talks to
//! the renderer only through the command ring buffer.
//!
//! # Two-phase stop
//!
//! ```text
//!   stop()            FadeOut ──► renderer       state = Stopping
//!   ... stop_fade_ms later ...
//!   poll()            Halt    ──► renderer       state = Stopped
//! ```
//!
//! `pause()` works the same way with `Suspend`, which keeps the mixer so
//! `resume()` continues where it left off.
//!
//! Every scheduled task remembers the generation and session it was made
//! for. Any later lifecycle call bumps the generation, and every preset load
//! opens a new session, so a task that outlived its purpose (a stop followed
//! by a quick start, a pause followed by a preset switch) is dropped instead
//! of silencing the wrong thing.
//!
//! Nothing here blocks. The host calls [`EngineController::poll`]
//! periodically (a UI tick or timer is enough) to drive scheduled tasks.

use std::time::{Duration, Instant};

use rtrb::{Consumer, Producer};
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    engine::{
        command::{EngineCommand, SessionId},
        mixer::FinalMixer,
        PlaybackState,
    },
    error::{ensure_finite, EngineError},
    presets::{self, Preset},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskAction {
    Suspend,
    Halt,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    due: Instant,
    generation: u64,
    session: SessionId,
    action: TaskAction,
}

pub struct EngineController {
    config: EngineConfig,
    commands: Producer<EngineCommand>,
    retired: Consumer<Box<FinalMixer>>,
    state: PlaybackState,
    preset: Option<&'static Preset>,
    session: SessionId,
    generation: u64,
    /// The renderer holds a mixer for `session` that `start` can play.
    mixer_live: bool,
    tasks: Vec<ScheduledTask>,
}

impl EngineController {
    pub(crate) fn new(
        config: EngineConfig,
        commands: Producer<EngineCommand>,
        retired: Consumer<Box<FinalMixer>>,
    ) -> Self {
        Self {
            config,
            commands,
            retired,
            state: PlaybackState::Stopped,
            preset: None,
            session: 0,
            generation: 0,
            mixer_live: false,
            tasks: Vec::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_preset(&self) -> Option<&'static Preset> {
        self.preset
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Session of the most recently installed mixer.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Build `id` and hand it to the renderer.
    ///
    /// While playing, the new preset crossfades with the old one over
    /// `crossfade_ms`. In any other state it is installed silent and starts
    /// with the next `start()` / `resume()`. On error nothing changes.
    pub fn load_preset(&mut self, id: &str) -> Result<(), EngineError> {
        let preset = presets::find(id)?;
        let mixer = presets::build(
            preset,
            self.config.sample_rate,
            self.config.max_frame_count,
        )?;

        let session = self.session + 1;
        let crossfade_ms = (self.state == PlaybackState::Playing).then_some(self.config.crossfade_ms);
        self.push(EngineCommand::Install {
            mixer: Box::new(mixer),
            session,
            crossfade_ms,
        })?;

        self.session = session;
        self.generation += 1;
        self.preset = Some(preset);
        self.mixer_live = true;
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Playing,
            PlaybackState::Pausing | PlaybackState::Paused => PlaybackState::Paused,
            PlaybackState::Stopping | PlaybackState::Stopped => PlaybackState::Stopped,
        };

        info!(
            "Loaded preset {} (session {}, {} layers{})",
            preset.id,
            session,
            preset.layers.len(),
            if crossfade_ms.is_some() { ", crossfading" } else { "" }
        );
        Ok(())
    }

    /// Fade the loaded preset in. After a full stop the preset is rebuilt
    /// from scratch so no state from the previous run carries over.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let preset = self.preset.ok_or(EngineError::NoPresetLoaded)?;
        if self.state == PlaybackState::Playing {
            return Ok(());
        }

        if !self.mixer_live {
            let mixer = presets::build(
                preset,
                self.config.sample_rate,
                self.config.max_frame_count,
            )?;
            if self.commands.slots() < 2 {
                return Err(EngineError::CommandQueueFull);
            }

            let session = self.session + 1;
            self.push(EngineCommand::Install {
                mixer: Box::new(mixer),
                session,
                crossfade_ms: None,
            })?;
            self.session = session;
            self.mixer_live = true;
            debug!("Rebuilt preset {} for session {}", preset.id, session);
        }

        self.push(EngineCommand::Play {
            session: self.session,
            fade_ms: self.config.fade_in_ms,
        })?;
        self.generation += 1;
        self.transition(PlaybackState::Playing);
        Ok(())
    }

    /// Fade out, then release the mixer once the fade has finished.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.stop_at(Instant::now())
    }

    /// Fade out, then go idle while keeping the mixer for `resume`.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        self.pause_at(Instant::now())
    }

    /// Continue after `pause`. From a stopped state this is `start`.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        match self.state {
            PlaybackState::Pausing | PlaybackState::Paused => {
                self.push(EngineCommand::Play {
                    session: self.session,
                    fade_ms: self.config.fade_in_ms,
                })?;
                self.generation += 1;
                self.transition(PlaybackState::Playing);
                Ok(())
            }
            PlaybackState::Playing => Ok(()),
            PlaybackState::Stopping | PlaybackState::Stopped => self.start(),
        }
    }

    /// Global output gain, clamped to `[0, 1]` and smoothed by the renderer.
    pub fn set_master_gain(&mut self, gain: f32) -> Result<(), EngineError> {
        let gain = ensure_finite("master_gain", gain)?.clamp(0.0, 1.0);
        self.push(EngineCommand::SetMasterGain(gain))
    }

    /// Drive scheduled tasks and free retired mixers.
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    /// [`poll`](Self::poll) against an explicit clock.
    pub fn poll_at(&mut self, now: Instant) {
        let mut freed = 0;
        while let Ok(mixer) = self.retired.pop() {
            drop(mixer);
            freed += 1;
        }
        if freed > 0 {
            debug!("Freed {} retired mixer(s)", freed);
        }

        let mut i = 0;
        while i < self.tasks.len() {
            let task = self.tasks[i];
            if task.due > now {
                i += 1;
                continue;
            }
            if task.generation != self.generation || task.session != self.session {
                debug!(
                    "Dropping stale {:?} task (generation {}, session {})",
                    task.action, task.generation, task.session
                );
                self.tasks.swap_remove(i);
                continue;
            }
            match self.run_task(task) {
                Ok(()) => {
                    self.tasks.swap_remove(i);
                }
                Err(err) => {
                    warn!("Deferring {:?}: {}", task.action, err);
                    i += 1;
                }
            }
        }
    }

    /// [`stop`](Self::stop) against an explicit clock.
    pub fn stop_at(&mut self, now: Instant) -> Result<(), EngineError> {
        match self.state {
            PlaybackState::Stopped | PlaybackState::Stopping => Ok(()),
            PlaybackState::Paused => {
                // Already silent, nothing to fade.
                self.push(EngineCommand::Halt {
                    session: self.session,
                })?;
                self.generation += 1;
                self.mixer_live = false;
                self.transition(PlaybackState::Stopped);
                Ok(())
            }
            PlaybackState::Playing | PlaybackState::Pausing => {
                self.fade_out_then(now, TaskAction::Halt)?;
                self.transition(PlaybackState::Stopping);
                Ok(())
            }
        }
    }

    /// [`pause`](Self::pause) against an explicit clock.
    pub fn pause_at(&mut self, now: Instant) -> Result<(), EngineError> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        self.fade_out_then(now, TaskAction::Suspend)?;
        self.transition(PlaybackState::Pausing);
        Ok(())
    }

    fn fade_out_then(&mut self, now: Instant, action: TaskAction) -> Result<(), EngineError> {
        let fade_ms = self.config.stop_fade_ms;
        self.push(EngineCommand::FadeOut {
            session: self.session,
            fade_ms,
        })?;
        self.generation += 1;
        self.tasks.push(ScheduledTask {
            due: now + Duration::from_secs_f32(fade_ms * 0.001),
            generation: self.generation,
            session: self.session,
            action,
        });
        Ok(())
    }

    fn run_task(&mut self, task: ScheduledTask) -> Result<(), EngineError> {
        match task.action {
            TaskAction::Suspend => {
                self.push(EngineCommand::Suspend {
                    session: task.session,
                })?;
                self.transition(PlaybackState::Paused);
            }
            TaskAction::Halt => {
                self.push(EngineCommand::Halt {
                    session: task.session,
                })?;
                self.mixer_live = false;
                self.transition(PlaybackState::Stopped);
            }
        }
        Ok(())
    }

    fn push(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        self.commands.push(command).map_err(|_| {
            warn!("Command queue full, dropping command");
            EngineError::CommandQueueFull
        })
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            info!("Playback {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
