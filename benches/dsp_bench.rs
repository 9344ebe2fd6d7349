//! Benchmarks for the tone engine.
//!
//! Run with: cargo bench
//!
//! The render path runs inside the audio callback, so it has to finish well
//! within the real-time deadline for every block.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Oscillator, smoothing and mapping primitives
//!   - scenarios/*  Full engine render with a concurrent control thread

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_control,
    scenarios::bench_engine,
);
criterion_main!(benches);
