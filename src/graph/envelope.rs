use crate::{
    dsp::envelope::{Envelope, EnvelopeState, NoteEnvelope},
    graph::node::Signal,
};

/// One-shot envelope as a graph node.
///
/// Outputs the envelope level, so it is normally used as an amplitude
/// modulator: `source.amplify(EnvNode::triggered(shape))`. The node goes
/// inactive after its release completes; `reset` (or `trigger`) starts it
/// again from zero.
pub struct EnvNode {
    env: Envelope,
    auto_trigger: bool,
}

impl EnvNode {
    /// An idle envelope, silent until `trigger` is called.
    pub fn new(shape: NoteEnvelope) -> Self {
        Self {
            env: Envelope::new(shape),
            auto_trigger: false,
        }
    }

    /// An envelope that starts its attack immediately, and again after
    /// every `reset`.
    pub fn triggered(shape: NoteEnvelope) -> Self {
        let mut env = Envelope::new(shape);
        env.trigger();
        Self {
            env,
            auto_trigger: true,
        }
    }

    pub fn trigger(&mut self) {
        self.env.trigger();
    }

    pub fn state(&self) -> EnvelopeState {
        self.env.state()
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }
}

impl Signal for EnvNode {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        self.env.next_sample(dt)
    }

    fn reset(&mut self) {
        self.env.reset();
        if self.auto_trigger {
            self.env.trigger();
        }
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
