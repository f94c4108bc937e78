use crate::{
    graph::node::{Processor, RenderCtx, Signal},
    MAX_BLOCK_SIZE,
};

/// `signal × modulator`, sample by sample.
///
/// With an `LfoNode` as the modulator this is amplitude modulation: the
/// LFO's mapped range becomes the signal's gain.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: Signal, M: Signal> Signal for Amplify<N, M> {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        self.signal.next_sample(dt) * self.modulator.next_sample(dt)
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // Chunk so the scratch buffer never has to grow (RT-safe, no allocation)
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.signal.render_block(chunk, ctx);

            let frames = &mut self.temp_buffer[..chunk.len()];
            self.modulator.render_block(frames, ctx);

            for (o, m) in chunk.iter_mut().zip(frames.iter()) {
                *o *= *m;
            }
        }
    }

    fn reset(&mut self) {
        self.signal.reset();
        self.modulator.reset();
    }

    fn is_active(&self) -> bool {
        self.modulator.is_active() && self.signal.is_active()
    }
}

/// A constant level, for fixed gains inside a graph.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub f32);

impl Signal for Constant {
    #[inline]
    fn next_sample(&mut self, _dt: f32) -> f32 {
        self.0
    }

    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        out.fill(self.0);
    }

    fn reset(&mut self) {}
}

/// Bounds a control signal to `[min, max]`.
///
/// Summed LFOs can overshoot the range a gain makes sense in; clamping
/// keeps an amplitude from going negative (which would invert the signal).
#[derive(Debug, Clone, Copy)]
pub struct Clamp {
    min: f32,
    max: f32,
}

impl Clamp {
    /// Gains in `[0, 1]`.
    pub const UNIT: Clamp = Clamp { min: 0.0, max: 1.0 };

    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }
}

impl Processor for Clamp {
    #[inline]
    fn process(&mut self, input: f32, _dt: f32) -> f32 {
        input.max(self.min).min(self.max)
    }

    fn reset(&mut self) {}
}
