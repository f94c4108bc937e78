//! The real-time half of the engine.
//!
//! `EngineRenderer` lives inside the host's audio callback. At the top of
//! every `render` it drains the command queue, then renders whatever mixers
//! it owns. It never allocates, never locks, never logs and never frees a
//! mixer: retired mixers travel back to the control thread over a second
//! ring buffer and are dropped there.
//!
//! # Mixer slots
//!
//! ```text
//!   current  ──► render ─┐
//!                        ├─► Σ ─► × master gain ─► out
//!   outgoing ──► render ─┘
//! ```
//!
//! `current` is the mixer of the active session. `outgoing` only exists
//! while a previous preset fades away after a switch; it is retired as soon
//! as its fade reaches silence.
//!
//! # Going idle
//!
//! `Suspend` and `Halt` only take effect once the current mixer is silent.
//! The control thread schedules them after the fade-out duration, but if
//! its clock runs ahead of the audio clock the renderer simply waits for
//! the fade to finish instead of cutting it short.

use rtrb::{Consumer, Producer, PushError};

use crate::{
    dsp::{
        fade::FadeCurve,
        mix::{spread_interleaved, sum_in_place},
    },
    engine::{
        command::{EngineCommand, SessionId},
        mixer::{FinalMixer, MixerState},
    },
    MAX_BLOCK_SIZE,
};

/// Time constant of the master gain smoother.
const MASTER_GAIN_SMOOTHING_SECONDS: f32 = 0.02;
/// Fade used to silence a mixer that is replaced without a crossfade.
const DECLICK_MS: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingIdle {
    Suspend,
    Halt,
}

pub struct EngineRenderer {
    commands: Consumer<EngineCommand>,
    retired: Producer<Box<FinalMixer>>,
    current: Option<Box<FinalMixer>>,
    outgoing: Option<Box<FinalMixer>>,
    session: SessionId,
    pending: Option<PendingIdle>,
    master_target: f32,
    master_gain: f32,
    master_coeff: f32,
    scratch: Box<[f32]>,
    mono: Box<[f32]>,
    sample_rate: f32,
}

impl EngineRenderer {
    pub(crate) fn new(
        sample_rate: f32,
        max_frames: usize,
        commands: Consumer<EngineCommand>,
        retired: Producer<Box<FinalMixer>>,
    ) -> Self {
        let block = max_frames.clamp(1, MAX_BLOCK_SIZE);
        Self {
            commands,
            retired,
            current: None,
            outgoing: None,
            session: 0,
            pending: None,
            master_target: 1.0,
            master_gain: 1.0,
            master_coeff: 1.0 - (-1.0 / (MASTER_GAIN_SMOOTHING_SECONDS * sample_rate)).exp(),
            scratch: vec![0.0; block].into_boxed_slice(),
            mono: vec![0.0; block].into_boxed_slice(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Nothing audible is left: no mixer, or only silent ones.
    pub fn is_idle(&self) -> bool {
        let silent = |slot: &Option<Box<FinalMixer>>| slot.as_ref().map_or(true, |m| m.is_silent());
        silent(&self.current) && silent(&self.outgoing)
    }

    /// Session of the most recently installed mixer.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Fill `out` with mono samples. With no mixer installed this writes
    /// silence.
    pub fn render(&mut self, out: &mut [f32]) {
        self.drain_commands();

        let chunk_len = self.scratch.len();
        for chunk in out.chunks_mut(chunk_len) {
            self.render_chunk(chunk);
        }
    }

    /// Render `out.len() / channels` frames and copy each one to every
    /// channel of the interleaved buffer. Trailing samples that don't make
    /// up a whole frame are zeroed.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        self.drain_commands();

        let frames_per_chunk = self.mono.len();
        let whole = out.len() - out.len() % channels;
        let (frames, rest) = out.split_at_mut(whole);
        rest.fill(0.0);

        for chunk in frames.chunks_mut(frames_per_chunk * channels) {
            let frame_count = chunk.len() / channels;
            let mut mono = std::mem::take(&mut self.mono);
            self.render_chunk(&mut mono[..frame_count]);
            spread_interleaved(&mono[..frame_count], chunk, channels);
            self.mono = mono;
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.pop() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: EngineCommand) {
        if let EngineCommand::Install {
            mixer,
            session,
            crossfade_ms,
        } = command
        {
            self.install(mixer, session, crossfade_ms);
            return;
        }
        if command.session().is_some_and(|session| session != self.session) {
            return;
        }

        match command {
            EngineCommand::Play { fade_ms, .. } => {
                self.pending = None;
                if let Some(mixer) = self.current.as_mut() {
                    mixer.apply_fade_in(fade_ms);
                }
            }
            EngineCommand::FadeOut { fade_ms, .. } => {
                if let Some(mixer) = self.current.as_mut() {
                    mixer.apply_fade_out(fade_ms);
                }
            }
            EngineCommand::Suspend { .. } => self.pending = Some(PendingIdle::Suspend),
            EngineCommand::Halt { .. } => self.pending = Some(PendingIdle::Halt),
            EngineCommand::SetMasterGain(gain) => self.master_target = gain.clamp(0.0, 1.0),
            EngineCommand::Install { .. } => {}
        }
        self.settle();
    }

    fn install(&mut self, mut mixer: Box<FinalMixer>, session: SessionId, crossfade_ms: Option<f32>) {
        self.session = session;
        self.pending = None;

        if let Some(ms) = crossfade_ms {
            mixer.fade_to(1.0, ms, FadeCurve::EqualPower);
        }

        match self.current.take() {
            Some(mut old) if !old.is_silent() => {
                match crossfade_ms {
                    Some(ms) => old.fade_to(0.0, ms, FadeCurve::EqualPower),
                    None if old.state() != MixerState::FadingOut => {
                        old.fade_to(0.0, DECLICK_MS, FadeCurve::Linear)
                    }
                    None => {}
                }
                self.replace_outgoing(old);
            }
            Some(old) => self.retire(old),
            None => {}
        }
        self.current = Some(mixer);
    }

    fn replace_outgoing(&mut self, mixer: Box<FinalMixer>) {
        if let Some(older) = self.outgoing.replace(mixer) {
            self.retire(older);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        if let Some(mixer) = self.current.as_mut() {
            if !mixer.is_silent() {
                mixer.render(out);
            }
        }
        if let Some(mixer) = self.outgoing.as_mut() {
            let scratch = &mut self.scratch[..out.len()];
            mixer.render(scratch);
            sum_in_place(out, scratch);
        }

        for sample in out.iter_mut() {
            self.master_gain += (self.master_target - self.master_gain) * self.master_coeff;
            *sample *= self.master_gain;
        }
        if (self.master_target - self.master_gain).abs() < 1.0e-6 {
            self.master_gain = self.master_target;
        }

        self.settle();
    }

    /// Retire finished mixers and apply a pending suspend/halt once the
    /// current mixer has gone quiet.
    fn settle(&mut self) {
        if self.outgoing.as_ref().is_some_and(|m| m.is_silent()) {
            if let Some(done) = self.outgoing.take() {
                self.retire(done);
            }
        }

        let Some(pending) = self.pending else {
            return;
        };
        if self.current.as_ref().is_some_and(|m| !m.is_silent()) {
            return;
        }
        self.pending = None;
        if pending == PendingIdle::Halt {
            if let Some(done) = self.current.take() {
                self.retire(done);
            }
        }
    }

    fn retire(&mut self, mixer: Box<FinalMixer>) {
        if let Err(PushError::Full(mixer)) = self.retired.push(mixer) {
            // The control thread stopped polling; freeing here is the only
            // option left.
            drop(mixer);
        }
    }
}
