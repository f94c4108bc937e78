use crate::{
    dsp::{
        lfo::{Lfo, LfoRange},
        oscillator::Waveform,
    },
    error::ConfigError,
    graph::node::Signal,
};

/*
LFO Node
========

An `LfoNode` outputs parameter values, not audio. It runs a sub-audio
oscillator and maps its bipolar output onto a `[min, max]` range with the
one mapping every modulated parameter uses (`LfoRange::map`):

    value = min + (max - min) · (lfo + 1) / 2

Use it wherever a value should drift slowly:

  // Breeze: noise amplitude breathing between 0.02 and 0.12 every ~17 s
  let breeze = NoiseNode::pink(7)
      .amplify(LfoNode::sine(0.06, LfoRange::new(0.02, 0.12)?)?);

  // Ocean: lowpass cutoff swelling between 600 Hz and 1600 Hz
  let swell = FilterNode::lowpass(1_000.0, 0.7, sr)?
      .modulate(LfoNode::sine(0.08, LfoRange::new(600.0, 1_600.0)?)?, FilterParam::Cutoff);

See `dsp/lfo.rs` for typical rates.
*/

pub struct LfoNode {
    lfo: Lfo,
    range: LfoRange,
}

impl LfoNode {
    pub fn new(waveform: Waveform, frequency: f32, range: LfoRange) -> Result<Self, ConfigError> {
        Ok(Self {
            lfo: Lfo::new(waveform, frequency)?,
            range,
        })
    }

    pub fn sine(frequency: f32, range: LfoRange) -> Result<Self, ConfigError> {
        Self::new(Waveform::Sine, frequency, range)
    }

    /// Start the cycle at `phase` radians.
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.lfo = self.lfo.with_phase(phase);
        self
    }

    pub fn range(&self) -> LfoRange {
        self.range
    }
}

impl Signal for LfoNode {
    #[inline]
    fn next_sample(&mut self, dt: f32) -> f32 {
        self.range.map(self.lfo.next_value(dt))
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::RenderCtx;

    #[test]
    fn output_stays_within_range() {
        let range = LfoRange::new(0.02, 0.12).unwrap();
        let mut lfo = LfoNode::sine(5.0, range).unwrap();
        let mut buffer = vec![0.0; 48_000];
        lfo.render_block(&mut buffer, &RenderCtx::new(48_000.0));

        for &sample in &buffer {
            assert!(
                (0.02 - 1e-6..=0.12 + 1e-6).contains(&sample),
                "LFO sample {sample} out of range"
            );
        }
        let max = buffer.iter().copied().fold(f32::MIN, f32::max);
        let min = buffer.iter().copied().fold(f32::MAX, f32::min);
        assert!(max > 0.119 && min < 0.021, "should sweep the full range");
    }

    #[test]
    fn starts_at_center_for_sine() {
        let range = LfoRange::new(600.0, 1_600.0).unwrap();
        let mut lfo = LfoNode::sine(0.08, range).unwrap();
        assert!((lfo.next_sample(0.001) - 1_100.0).abs() < 1e-3);
    }

    #[test]
    fn triangle_reaches_extremes() {
        let range = LfoRange::new(-1.0, 1.0).unwrap();
        let mut lfo = LfoNode::new(Waveform::Triangle, 1.0, range).unwrap();
        let dt = 1.0 / 1_000.0;
        let samples: Vec<f32> = (0..1_000).map(|_| lfo.next_sample(dt)).collect();
        assert!((samples[250] - 1.0).abs() < 1e-3);
        assert!((samples[750] + 1.0).abs() < 1e-3);
    }
}
