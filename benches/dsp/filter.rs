//! Benchmarks for the TPT state-variable filter.

use std::hint::black_box;

use ambient_dsp::dsp::filter::{FilterType, SVFilter};
use ambient_dsp::graph::extensions::ProcessorExt;
use ambient_dsp::graph::filter::{FilterNode, FilterParam};
use ambient_dsp::graph::lfo::LfoNode;
use ambient_dsp::graph::node::{Processor, RenderCtx};
use ambient_dsp::dsp::lfo::LfoRange;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, filter_type) in [
            ("lowpass", FilterType::LowPass),
            ("highpass", FilterType::HighPass),
            ("bandpass", FilterType::BandPass),
        ] {
            let mut filter = SVFilter::new(filter_type, 1_000.0, 0.707, SAMPLE_RATE).unwrap();
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer));
                })
            });
        }

        // Cutoff swept by an LFO: coefficients recomputed every control tick
        let range = LfoRange::new(600.0, 1_600.0).unwrap();
        let mut swept = FilterNode::lowpass(1_000.0, 0.707, SAMPLE_RATE)
            .unwrap()
            .modulate(LfoNode::sine(0.05, range).unwrap(), FilterParam::Cutoff);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                swept.process_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
