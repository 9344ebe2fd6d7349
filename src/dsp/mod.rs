//! Low-level DSP primitives used by the tone engine.
//!
//! The oscillator is allocation-free and realtime-safe, so it can live inside
//! the render half of the engine. The smoothing window and the mappers belong
//! to the control path: they are cheap, but they are never touched from the
//! audio callback.

/// Distance to frequency and UI volume to engine volume conversions.
pub mod mapping;
/// Phase-accumulating sine oscillator.
pub mod oscillator;
/// Moving-average window for noisy distance readings.
pub mod smoothing;

pub use mapping::{FrequencyMapper, VolumeMapper};
pub use oscillator::OscillatorBlock;
pub use smoothing::SmoothingWindow;
