//! Benchmarks for every catalog preset rendered through its final mixer.

use std::hint::black_box;

use ambient_dsp::dsp::fade::FadeCurve;
use ambient_dsp::presets;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/presets");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for preset in presets::catalog() {
            let mut mixer = presets::build(preset, SAMPLE_RATE, size).unwrap();
            mixer.fade_to(1.0, 0.0, FadeCurve::Linear);
            group.bench_with_input(BenchmarkId::new(preset.id, size), &size, |b, _| {
                b.iter(|| mixer.render(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
