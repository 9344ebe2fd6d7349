//! Full render path, with and without a control thread hammering the
//! parameter store.

use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion};
use theremin_dsp::{EngineConfig, ThereminEngine};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // === IDLE CONTROL ===
        // Baseline: snapshot + stereo render, no contention
        let (_control, mut renderer) =
            ThereminEngine::new(48_000.0, EngineConfig::default()).split();
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                renderer.render(black_box(&mut buffer), 2);
            })
        });

        // === CONTENDED CONTROL ===
        // A writer thread publishes distances as fast as it can. The render
        // cost should not move: the renderer never waits on the writer.
        let (control, mut renderer) =
            ThereminEngine::new(48_000.0, EngineConfig::default()).split();
        let stop = Arc::new(AtomicBool::new(false));
        let writer_stop = Arc::clone(&stop);
        let writer = thread::spawn(move || {
            let mut control = control;
            let mut distance = 0.1f32;
            while !writer_stop.load(Ordering::Relaxed) {
                distance = if distance > 1.0 { 0.1 } else { distance + 0.001 };
                control.on_distance_sample(distance);
            }
        });

        group.bench_with_input(BenchmarkId::new("contended", size), &size, |b, _| {
            b.iter(|| {
                renderer.render(black_box(&mut buffer), 2);
            })
        });

        stop.store(true, Ordering::Relaxed);
        let _ = writer.join();
    }

    group.finish();
}
