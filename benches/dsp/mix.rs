//! Benchmarks for buffer mixing, fades and the limiter.

use std::hint::black_box;

use ambient_dsp::dsp::fade::{Fade, FadeCurve};
use ambient_dsp::dsp::limiter::SoftLimiter;
use ambient_dsp::dsp::mix;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        // Generate test signals
        let signal_a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let signal_b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.15).cos()).collect();
        let mut output = vec![0.0f32; size];

        // Layer summing with gain
        group.bench_with_input(BenchmarkId::new("accumulate", size), &size, |b, _| {
            b.iter(|| {
                output.copy_from_slice(&signal_a);
                mix::accumulate(black_box(&mut output), black_box(&signal_b), black_box(0.7));
            })
        });

        // Soft limiter (tanh per sample)
        let limiter = SoftLimiter::default();
        group.bench_with_input(BenchmarkId::new("limiter", size), &size, |b, _| {
            b.iter(|| {
                output.copy_from_slice(&signal_a);
                limiter.render(black_box(&mut output));
            })
        });

        // Equal-power fade (sin/cos per sample)
        group.bench_with_input(BenchmarkId::new("fade_equal_power", size), &size, |b, _| {
            b.iter(|| {
                let mut fade = Fade::new(0.0, 1.0, 48_000, FadeCurve::EqualPower);
                output.copy_from_slice(&signal_a);
                for sample in black_box(&mut output).iter_mut() {
                    *sample *= fade.next_gain();
                }
            })
        });

        // Mono to stereo interleave
        let mut stereo = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("spread_stereo", size), &size, |b, _| {
            b.iter(|| mix::spread_interleaved(black_box(&signal_a), black_box(&mut stereo), 2))
        });
    }

    group.finish();
}
