//! Engine-level benchmarks.

mod engine;

pub use engine::bench_engine;
