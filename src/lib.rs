pub mod dsp; // Oscillator, smoothing and mapping primitives
pub mod engine; // Control/render halves and the lock-free parameter handoff

pub use engine::{EngineConfig, ThereminEngine, ToneControl, ToneRenderer};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

/// Output ceiling for the engine volume. Leaves headroom below full scale.
pub const MAX_VOLUME: f32 = 0.8;
