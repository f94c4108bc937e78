use crate::graph::node::Signal;

/*
Parallel Signal Mixing
======================

Two ways to combine signals in parallel:

  Mix   weighted: output = A × (1 - balance) + B × balance
        balance = 0.0 → all A, 0.5 → half each, 1.0 → all B
        The weights sum to 1.0, so two full-scale inputs stay full-scale.

  Sum   plain addition: output = A + B
        Used for control signals that stack, e.g. several wave swells at
        different periods added into one amplitude curve:

          let swell = LfoNode::sine(0.15, LfoRange::new(0.2, 0.8)?)?
              .sum(LfoNode::sine(0.08, LfoRange::new(-0.2, 0.2)?)?)
              .sum(LfoNode::sine(0.25, LfoRange::new(-0.15, 0.15)?)?);

Both sources always advance together, even at balance 0.0 or 1.0, so the
silent side does not fall behind and jump when the balance changes.
*/

pub struct Mix<A, B> {
    pub source_a: A,
    pub source_b: B,
    balance: f32, // 0.0 = all A, 1.0 = all B, 0.5 = equal mix
}

impl<A, B> Mix<A, B> {
    pub fn new(source_a: A, source_b: B, balance: f32) -> Self {
        let balance = if balance.is_finite() { balance } else { 0.5 };
        Self {
            source_a,
            source_b,
            balance: balance.clamp(0.0, 1.0),
        }
    }

    pub fn balance(&self) -> f32 {
        self.balance
    }
}

impl<A: Signal, B: Signal> Signal for Mix<A, B> {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        let a = self.source_a.next_sample(dt);
        let b = self.source_b.next_sample(dt);
        a * (1.0 - self.balance) + b * self.balance
    }

    fn reset(&mut self) {
        self.source_a.reset();
        self.source_b.reset();
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }
}

pub struct Sum<A, B> {
    pub source_a: A,
    pub source_b: B,
}

impl<A, B> Sum<A, B> {
    pub fn new(source_a: A, source_b: B) -> Self {
        Self { source_a, source_b }
    }
}

impl<A: Signal, B: Signal> Signal for Sum<A, B> {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        self.source_a.next_sample(dt) + self.source_b.next_sample(dt)
    }

    fn reset(&mut self) {
        self.source_a.reset();
        self.source_b.reset();
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{amplify::Constant, extensions::SignalExt};

    #[test]
    fn test_mix_extremes() {
        let mut all_a = Constant(1.0).mix(Constant(0.0), 0.0);
        let mut all_b = Constant(1.0).mix(Constant(0.0), 1.0);
        assert_eq!(all_a.next_sample(0.0), 1.0);
        assert_eq!(all_b.next_sample(0.0), 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let mut node = Constant(1.0).mix(Constant(1.0), 0.5);
        // (1.0 × 0.5) + (1.0 × 0.5) = 1.0, not 2.0
        assert_eq!(node.next_sample(0.0), 1.0);
    }

    #[test]
    fn test_balance_clamped() {
        assert_eq!(Mix::new(Constant(1.0), Constant(0.0), 2.0).balance(), 1.0);
        assert_eq!(Mix::new(Constant(1.0), Constant(0.0), -1.0).balance(), 0.0);
        assert_eq!(Mix::new(Constant(1.0), Constant(0.0), f32::NAN).balance(), 0.5);
    }

    #[test]
    fn sum_adds() {
        let mut node = Constant(0.5).sum(Constant(0.25)).sum(Constant(0.25));
        assert_eq!(node.next_sample(0.0), 1.0);
    }
}
