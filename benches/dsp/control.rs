//! Benchmarks for the control path: smoothing plus mapping per reading.

use std::hint::black_box;

use criterion::Criterion;
use theremin_dsp::dsp::{FrequencyMapper, SmoothingWindow};

pub fn bench_control(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/control");
    let mapper = FrequencyMapper::default();

    group.bench_function("map", |b| {
        b.iter(|| mapper.map(black_box(0.42), black_box(1.3)))
    });

    for &size in &[1usize, 4, 16] {
        let mut window = SmoothingWindow::new(size);
        let mut distance = 0.1f32;
        group.bench_function(format!("smooth_and_map/{size}"), |b| {
            b.iter(|| {
                distance = if distance > 1.0 { 0.1 } else { distance + 0.013 };
                let smoothed = window.push(black_box(distance));
                mapper.map(smoothed, 1.0)
            })
        });
    }

    group.finish();
}
