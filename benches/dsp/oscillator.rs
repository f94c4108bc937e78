//! Benchmarks for oscillator and noise generation.

use std::hint::black_box;

use ambient_dsp::dsp::noise::{NoiseColor, NoiseSource};
use ambient_dsp::dsp::oscillator::{Oscillator, Waveform};
use ambient_dsp::graph::node::{RenderCtx, Signal};
use ambient_dsp::graph::partials::{Fundamental, Harmonic, PartialsNode};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::new(SAMPLE_RATE);
    let dt = ctx.dt();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine uses sin(), the others are piecewise linear
        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("triangle", Waveform::Triangle),
            ("saw", Waveform::Saw),
            ("square", Waveform::Square),
        ] {
            let mut osc = Oscillator::new(waveform, 440.0).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in black_box(&mut buffer).iter_mut() {
                        *sample = osc.next_sample(dt);
                    }
                })
            });
        }

        for (name, color) in [
            ("noise_white", NoiseColor::White),
            ("noise_pink", NoiseColor::Pink),
            ("noise_brown", NoiseColor::Brown),
        ] {
            let mut noise = NoiseSource::new(color, 42);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| noise.render(black_box(&mut buffer)))
            });
        }

        // Organ drone: 2 fundamentals x 4 harmonics
        let mut drone = PartialsNode::new(
            &[Fundamental::new(130.81, 0.5), Fundamental::new(196.0, 0.35)],
            &[
                Harmonic::new(1.0, 0.9),
                Harmonic::new(2.0, 0.4),
                Harmonic::new(3.0, 0.25),
                Harmonic::new(4.0, 0.15),
            ],
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("drone_8_partials", size), &size, |b, _| {
            b.iter(|| drone.render_block(black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
