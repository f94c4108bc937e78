//! Benchmarks for the note envelope.

use std::hint::black_box;

use ambient_dsp::dsp::envelope::Envelope;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let dt = 1.0 / SAMPLE_RATE;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (sin² ramp)
        let mut env = Envelope::asr(3_600.0, 3_600.0, 0.3);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(dt)))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::asr(0.001, 3_600.0, 0.3);
        env.trigger();
        for _ in 0..200 {
            env.next_sample(dt);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(dt)))
        });
    }

    group.finish();
}
