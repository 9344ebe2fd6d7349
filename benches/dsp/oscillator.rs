//! Benchmarks for sine generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use theremin_dsp::dsp::OscillatorBlock;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        // Mono - one sin() per sample
        let mut buffer = vec![0.0f32; size];
        let mut osc = OscillatorBlock::new(48_000.0);
        group.bench_with_input(BenchmarkId::new("mono", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(440.0), black_box(0.8));
            })
        });

        // Stereo - same sin() count, twice the writes
        let mut buffer = vec![0.0f32; size * 2];
        let mut osc = OscillatorBlock::new(48_000.0);
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                osc.render_interleaved(
                    black_box(&mut buffer),
                    2,
                    black_box(440.0),
                    black_box(0.8),
                );
            })
        });
    }

    group.finish();
}
