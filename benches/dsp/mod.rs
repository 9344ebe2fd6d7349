//! Benchmarks for low-level DSP primitives.

mod control;
mod oscillator;

pub use control::bench_control;
pub use oscillator::bench_oscillator;
