//! Benchmarks for the engine render path, including a preset crossfade
//! where two mixers render at once.

use std::hint::black_box;

use ambient_dsp::{AmbientEngine, EngineConfig};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut stereo = vec![0.0f32; size * 2];

        let (mut control, mut render) =
            AmbientEngine::new(EngineConfig::new(SAMPLE_RATE, size)).unwrap();
        control.load_preset("rain_v1").unwrap();
        control.start().unwrap();
        group.bench_with_input(BenchmarkId::new("rain_stereo", size), &size, |b, _| {
            b.iter(|| render.render_interleaved(black_box(&mut stereo), 2))
        });

        // Crossfade held open so both mixers render every block
        let config = EngineConfig {
            crossfade_ms: 3_600_000.0,
            ..EngineConfig::new(SAMPLE_RATE, size)
        };
        let (mut control, mut render) = AmbientEngine::new(config).unwrap();
        control.load_preset("ocean_waves_v1").unwrap();
        control.start().unwrap();
        render.render_interleaved(&mut stereo, 2);
        control.load_preset("cathedral_stillness_v1").unwrap();
        group.bench_with_input(BenchmarkId::new("crossfade_stereo", size), &size, |b, _| {
            b.iter(|| render.render_interleaved(black_box(&mut stereo), 2))
        });
    }

    group.finish();
}
