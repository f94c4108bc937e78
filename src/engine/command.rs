use crate::engine::mixer::FinalMixer;

/// Identifies one preset activation. Every `load_preset` (and every restart
/// after a full stop) opens a new session; commands tagged with an older
/// session are ignored by the renderer.
pub type SessionId = u64;

/// Messages from the control thread to the render thread.
///
/// Everything that allocates (building a mixer) happens before the command
/// is pushed. The renderer only moves boxes around and adjusts fades.
pub enum EngineCommand {
    /// Make `mixer` the current mixer for `session`.
    ///
    /// With `crossfade_ms` set and something already playing, the previous
    /// mixer fades out in parallel while the new one fades in. Otherwise the
    /// previous mixer gets a short declick fade before it is retired, and the
    /// new one waits, silent, for [`EngineCommand::Play`].
    Install {
        mixer: Box<FinalMixer>,
        session: SessionId,
        crossfade_ms: Option<f32>,
    },
    /// Fade the current mixer in to unity and start producing output.
    Play { session: SessionId, fade_ms: f32 },
    /// Fade the current mixer out; the render path keeps running.
    FadeOut { session: SessionId, fade_ms: f32 },
    /// Go idle once the current mixer is silent, keeping it for `Play`.
    Suspend { session: SessionId },
    /// Go idle once the current mixer is silent and retire it.
    Halt { session: SessionId },
    /// Global output multiplier, already clamped to `[0, 1]`.
    SetMasterGain(f32),
}

impl EngineCommand {
    /// Session the command belongs to, if it is session-scoped.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            EngineCommand::Install { session, .. }
            | EngineCommand::Play { session, .. }
            | EngineCommand::FadeOut { session, .. }
            | EngineCommand::Suspend { session }
            | EngineCommand::Halt { session } => Some(*session),
            EngineCommand::SetMasterGain(_) => None,
        }
    }
}

impl std::fmt::Debug for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineCommand::Install {
                mixer,
                session,
                crossfade_ms,
            } => f
                .debug_struct("Install")
                .field("layers", &mixer.layer_count())
                .field("session", session)
                .field("crossfade_ms", crossfade_ms)
                .finish(),
            EngineCommand::Play { session, fade_ms } => f
                .debug_struct("Play")
                .field("session", session)
                .field("fade_ms", fade_ms)
                .finish(),
            EngineCommand::FadeOut { session, fade_ms } => f
                .debug_struct("FadeOut")
                .field("session", session)
                .field("fade_ms", fade_ms)
                .finish(),
            EngineCommand::Suspend { session } => {
                f.debug_struct("Suspend").field("session", session).finish()
            }
            EngineCommand::Halt { session } => {
                f.debug_struct("Halt").field("session", session).finish()
            }
            EngineCommand::SetMasterGain(gain) => {
                f.debug_tuple("SetMasterGain").field(gain).finish()
            }
        }
    }
}
