//! Benchmarks for the Schroeder reverb.

use std::hint::black_box;

use ambient_dsp::dsp::reverb::{ReverbParams, SchroederReverb};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    let rooms = [
        ("default", ReverbParams::default()),
        (
            "cathedral",
            ReverbParams {
                room_size: 2.2,
                damping: 0.35,
                decay: 0.88,
                mix: 0.55,
                predelay: 0.04,
            },
        ),
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        let mut buffer = input.clone();

        for (name, params) in rooms {
            let mut reverb = SchroederReverb::new(params, SAMPLE_RATE).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    reverb.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
