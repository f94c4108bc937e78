use crate::graph::node::{Modulatable, Processor, Signal};

/*
Modulate Node
=============

Connects a control signal (usually an `LfoNode`) to a parameter on another
node. The control signal's output IS the parameter value: range mapping
happens once, in the LFO, through `LfoRange::map`.

    cutoff(t) = lfo_range.map(lfo(t))

  // Wind: bandpass centre wandering between 400 and 1200 Hz
  let gusts = FilterNode::bandpass(800.0, 1.5, sr)?
      .modulate(LfoNode::sine(0.05, LfoRange::new(400.0, 1_200.0)?)?, FilterParam::Cutoff);


Control Rate
------------

The modulator advances every sample so its phase stays exact, but the
parameter is only written every `CONTROL_INTERVAL` samples. Setting a filter
cutoff recomputes `tan()`; at sub-Hz LFO rates a 16-sample hold (0.33 ms at
48 kHz) is far below anything audible.

The first sample after construction or `reset` always writes the parameter,
so the target never starts at a stale value.
*/

/// Samples between parameter writes.
pub const CONTROL_INTERVAL: u32 = 16;

pub struct Modulate<T, M>
where
    T: Modulatable,
{
    target: T,          // The node being modulated (e.g., FilterNode)
    modulator: M,       // The control source (e.g., LfoNode)
    param: T::Param,    // Which parameter to drive (e.g., FilterParam::Cutoff)
    countdown: u32,     // Samples until the next parameter write
}

impl<T, M> Modulate<T, M>
where
    T: Modulatable,
    M: Signal,
{
    pub fn new(target: T, modulator: M, param: T::Param) -> Self {
        Self {
            target,
            modulator,
            param,
            countdown: 0,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Advance the modulator one sample and write the parameter when due.
    #[inline]
    fn tick(&mut self, dt: f32) {
        let value = self.modulator.next_sample(dt);
        if self.countdown == 0 {
            self.target.set_param(self.param, value);
            self.countdown = CONTROL_INTERVAL;
        }
        self.countdown -= 1;
    }

    fn reset_control(&mut self) {
        self.modulator.reset();
        self.countdown = 0;
    }
}

impl<T, M> Processor for Modulate<T, M>
where
    T: Processor + Modulatable,
    M: Signal,
{
    #[inline]
    fn process(&mut self, input: f32, dt: f32) -> f32 {
        self.tick(dt);
        self.target.process(input, dt)
    }

    fn reset(&mut self) {
        self.reset_control();
        Processor::reset(&mut self.target);
    }
}

impl<T, M> Signal for Modulate<T, M>
where
    T: Signal + Modulatable,
    M: Signal,
{
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        self.tick(dt);
        self.target.next_sample(dt)
    }

    fn reset(&mut self) {
        self.reset_control();
        Signal::reset(&mut self.target);
    }

    fn is_active(&self) -> bool {
        self.target.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::lfo::LfoRange,
        graph::{
            extensions::{ProcessorExt, SignalExt},
            filter::{FilterNode, FilterParam},
            lfo::LfoNode,
            noise::NoiseNode,
            oscillator::{OscNode, OscParam},
        },
    };

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn first_sample_writes_parameter() {
        let range = LfoRange::new(600.0, 1_600.0).unwrap();
        let mut node = FilterNode::lowpass(5_000.0, 0.707, SAMPLE_RATE)
            .unwrap()
            .modulate(LfoNode::sine(0.08, range).unwrap(), FilterParam::Cutoff);

        node.process(0.0, 1.0 / SAMPLE_RATE);
        // Sine LFO starts at its centre.
        assert!((node.target().get_param(FilterParam::Cutoff) - 1_100.0).abs() < 1e-2);
    }

    #[test]
    fn cutoff_follows_lfo_range() {
        let range = LfoRange::new(600.0, 1_600.0).unwrap();
        let mut node = FilterNode::lowpass(1_000.0, 0.707, SAMPLE_RATE)
            .unwrap()
            .modulate(LfoNode::sine(2.0, range).unwrap(), FilterParam::Cutoff);

        let dt = 1.0 / SAMPLE_RATE;
        let mut seen_min = f32::MAX;
        let mut seen_max = f32::MIN;
        for _ in 0..SAMPLE_RATE as usize {
            node.process(0.0, dt);
            let cutoff = node.target().get_param(FilterParam::Cutoff);
            seen_min = seen_min.min(cutoff);
            seen_max = seen_max.max(cutoff);
        }
        assert!(seen_min >= 600.0 - 1e-2 && seen_min < 610.0);
        assert!(seen_max <= 1_600.0 + 1e-2 && seen_max > 1_590.0);
    }

    #[test]
    fn extreme_modulation_stays_finite() {
        let range = LfoRange::new(-100_000.0, 100_000.0).unwrap();
        let mut node = NoiseNode::white(1).through(
            FilterNode::lowpass(1_000.0, 0.707, SAMPLE_RATE)
                .unwrap()
                .modulate(LfoNode::sine(1.0, range).unwrap(), FilterParam::Cutoff),
        );

        for _ in 0..48_000 {
            let sample = node.next_sample(1.0 / SAMPLE_RATE);
            assert!(sample.is_finite());
        }
    }

    #[test]
    fn modulates_signal_parameters() {
        let range = LfoRange::new(219.0, 221.0).unwrap();
        let mut node = OscNode::sine(440.0)
            .unwrap()
            .modulate(LfoNode::sine(5.0, range).unwrap(), OscParam::Frequency);
        node.next_sample(1.0 / SAMPLE_RATE);
        let f = node.target().get_param(OscParam::Frequency);
        assert!((f - 220.0).abs() < 1.0);
    }

    #[test]
    fn reset_replays() {
        let range = LfoRange::new(400.0, 1_200.0).unwrap();
        let mut node = NoiseNode::pink(5).through(
            FilterNode::bandpass(800.0, 1.5, SAMPLE_RATE)
                .unwrap()
                .modulate(LfoNode::sine(0.5, range).unwrap(), FilterParam::Cutoff),
        );
        let dt = 1.0 / SAMPLE_RATE;
        let first: Vec<f32> = (0..1_000).map(|_| node.next_sample(dt)).collect();
        node.reset();
        let second: Vec<f32> = (0..1_000).map(|_| node.next_sample(dt)).collect();
        assert_eq!(first, second);
    }
}
