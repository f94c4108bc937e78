/// Context passed to graph nodes during block rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }

    /// Seconds per sample.
    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.sample_rate
    }
}

/// A stateful generator: an owning object that advances its own state.
///
/// The output of call *n* depends only on the node's state after call
/// *n - 1* and the `dt` it is handed. Nodes never reset on their own;
/// `reset` restores the state they were constructed with.
pub trait Signal: Send {
    /// Produce the sample for the current instant, then advance by `dt`
    /// seconds.
    fn next_sample(&mut self, dt: f32) -> f32;

    /// Fill `out` with consecutive samples at the context's sample rate.
    ///
    /// Must produce exactly what repeated `next_sample(ctx.dt())` calls would.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let dt = ctx.dt();
        for sample in out.iter_mut() {
            *sample = self.next_sample(dt);
        }
    }

    /// Restore construction-time state (phase, seed, elapsed time).
    fn reset(&mut self);

    /// Whether the node can still produce non-silent output.
    fn is_active(&self) -> bool {
        true
    }
}

/// An in-place effect: one sample in, one sample out.
pub trait Processor: Send {
    fn process(&mut self, input: f32, dt: f32) -> f32;

    fn process_block(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let dt = ctx.dt();
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, dt);
        }
    }

    /// Clear internal memory (integrators, delay lines).
    fn reset(&mut self);
}

/// Trait for nodes that expose a parameter to modulation.
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    /// Set `param` to an absolute value. Implementations clamp rather than
    /// reject, since this runs on the render path.
    fn set_param(&mut self, param: Self::Param, value: f32);
}

/// A stateless generator: same output for the same time.
pub trait PureSignal: Send {
    fn sample_at(&self, t: f64) -> f32;
}

/// Drives a [`PureSignal`] from an owned clock so it can be used as a
/// [`Signal`].
pub struct Clocked<P> {
    signal: P,
    time: f64,
}

impl<P: PureSignal> Clocked<P> {
    pub fn new(signal: P) -> Self {
        Self { signal, time: 0.0 }
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

impl<P: PureSignal> Signal for Clocked<P> {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        let value = self.signal.sample_at(self.time);
        self.time += dt.max(0.0) as f64;
        value
    }

    fn reset(&mut self) {
        self.time = 0.0;
    }
}

/// Allow boxed nodes to be used as nodes (for dynamic dispatch)
impl Signal for Box<dyn Signal> {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        (**self).next_sample(dt)
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

impl Processor for Box<dyn Processor> {
    #[inline]
    fn process(&mut self, input: f32, dt: f32) -> f32 {
        (**self).process(input, dt)
    }

    fn process_block(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        (**self).process_block(buffer, ctx)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
