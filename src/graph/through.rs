use crate::graph::node::{Processor, RenderCtx, Signal};

/*
Serial Signal Chain (Through)
=============================

Through connects a source to a processor in series: the source renders, the
processor transforms the result in place.

  Source renders:  [0.5, 0.8, -0.3, 0.9, ...]
  Filter in-place: [0.4, 0.6, -0.2, 0.7, ...]

Common Use Cases:
-----------------

1. Coloured noise:
     let surf = NoiseNode::white(42)
         .through(FilterNode::lowpass(2_000.0, 0.707, sr)?);

2. Multi-stage filtering (steeper rolloff):
     let dark = source
         .through(FilterNode::lowpass(800.0, 0.707, sr)?)
         .through(FilterNode::lowpass(800.0, 0.707, sr)?);

Through vs Amplify vs Mix:
--------------------------
  Through: [Source] ──→ [Processor] ──→ output

  Amplify: [Signal] ──┬──→ (×) ──→ output
           [Mod]    ──┘

  Mix:     [A] ──────┬──→ (+) ──→ output
           [B] ──────┘
*/

pub struct Through<S, P> {
    source: S,
    processor: P,
}

impl<S, P> Through<S, P> {
    pub fn new(source: S, processor: P) -> Self {
        Self { source, processor }
    }
}

impl<S: Signal, P: Processor> Signal for Through<S, P> {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        let x = self.source.next_sample(dt);
        self.processor.process(x, dt)
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.processor.process_block(out, ctx);
    }

    fn reset(&mut self) {
        self.source.reset();
        self.processor.reset();
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
