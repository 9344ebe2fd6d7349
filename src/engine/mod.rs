//! The theremin tone engine.
//!
//! [`ThereminEngine`] is built once from the output device's sample rate and
//! an [`EngineConfig`], then [`split`](ThereminEngine::split) into two halves:
//!
//! - [`ToneControl`] stays with the UI/ranging thread. It owns the smoothing
//!   window and mapping parameters and publishes frequency and volume.
//! - [`ToneRenderer`] moves into the audio callback. It owns the oscillator
//!   phase and reads the published parameters once per callback.
//!
//! The halves share nothing but [`SharedParams`], which is lock-free.
//!
//! # Example
//!
//! ```
//! use theremin_dsp::{EngineConfig, ThereminEngine};
//!
//! let engine = ThereminEngine::new(48_000.0, EngineConfig::default());
//! let (mut control, mut renderer) = engine.split();
//!
//! control.on_volume_change(1.0);
//! control.on_distance_sample(0.55);
//!
//! let mut buffer = vec![0.0f32; 2 * 256];
//! renderer.render(&mut buffer, 2);
//! assert!(buffer.iter().all(|s| s.abs() <= theremin_dsp::MAX_VOLUME));
//! ```

pub mod params;
pub mod sink;

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{
    mapping::DEFAULT_FREQUENCY_RANGE, smoothing::DEFAULT_WINDOW_SIZE, FrequencyMapper,
    OscillatorBlock, SmoothingWindow, VolumeMapper,
};
use crate::{DEFAULT_SAMPLE_RATE, MAX_VOLUME};

pub use params::{SharedParams, ToneParams};
pub use sink::SampleSink;

/// Engine construction options.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Distance readings averaged before mapping. 1 disables smoothing.
    pub window_size: usize,
    /// Ceiling for the engine volume
    pub max_volume: f32,
    /// Initial range multiplier
    pub frequency_range: f32,
    /// Tone played before the first distance reading (Hz)
    pub initial_frequency: f32,
    /// Initial volume, normalized 0..1
    pub initial_volume: f32,
    pub mapper: FrequencyMapper,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            max_volume: MAX_VOLUME,
            frequency_range: DEFAULT_FREQUENCY_RANGE,
            initial_frequency: 440.0,
            initial_volume: 0.5,
            mapper: FrequencyMapper::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_max_volume(mut self, max_volume: f32) -> Self {
        self.max_volume = max_volume;
        self
    }

    pub fn with_frequency_range(mut self, frequency_range: f32) -> Self {
        self.frequency_range = frequency_range;
        self
    }

    pub fn with_initial_frequency(mut self, frequency: f32) -> Self {
        self.initial_frequency = frequency;
        self
    }

    pub fn with_initial_volume(mut self, normalized: f32) -> Self {
        self.initial_volume = normalized;
        self
    }

    pub fn with_mapper(mut self, mapper: FrequencyMapper) -> Self {
        self.mapper = mapper;
        self
    }
}

/// Control half: everything that runs at the pace of distance and UI events.
#[derive(Debug)]
pub struct ToneControl {
    shared: Arc<SharedParams>,
    window: SmoothingWindow,
    mapper: FrequencyMapper,
    volume: VolumeMapper,
    frequency_range: f32,
    last_raw: Option<f32>,
    last_smoothed: Option<f32>,
}

impl ToneControl {
    /// Feed a raw distance in meters.
    ///
    /// The reading goes through the smoothing window and the mapper, and the
    /// result becomes the new frequency. Returns the frequency as stored for
    /// the renderer, or `None` when the reading is not a finite number (the
    /// tone is left unchanged).
    pub fn on_distance_sample(&mut self, meters: f32) -> Option<f32> {
        if !meters.is_finite() {
            return None;
        }
        self.last_raw = Some(meters);
        let smoothed = self.window.push(meters);
        self.last_smoothed = Some(smoothed);

        let frequency = self.mapper.map(smoothed, self.frequency_range);
        Some(self.shared.set_frequency(frequency))
    }

    /// Feed a ranging update that may carry no distance (peer not connected).
    ///
    /// `None` keeps the current tone playing.
    pub fn on_ranging_update(&mut self, reading: Option<f32>) -> Option<f32> {
        reading.and_then(|meters| self.on_distance_sample(meters))
    }

    /// Set the volume from a normalized 0..1 control value.
    pub fn on_volume_change(&mut self, normalized: f32) {
        self.shared.set_volume(self.volume.map(normalized));
    }

    /// Change the range multiplier.
    ///
    /// If a distance has already been seen, the current smoothed distance is
    /// re-mapped so the change is heard without waiting for the next reading.
    pub fn on_frequency_range_change(&mut self, multiplier: f32) {
        self.frequency_range = self.mapper.sanitize_range(multiplier);
        if let Some(smoothed) = self.last_smoothed {
            let frequency = self.mapper.map(smoothed, self.frequency_range);
            self.shared.set_frequency(frequency);
        }
    }

    /// Apply a frequency directly, bypassing smoothing and mapping.
    pub fn set_frequency(&self, frequency: f32) {
        self.shared.set_frequency(frequency);
    }

    /// Current frequency and volume as the renderer will see them.
    pub fn params(&self) -> ToneParams {
        self.shared.snapshot()
    }

    /// Current volume on the normalized 0..1 scale.
    pub fn normalized_volume(&self) -> f32 {
        self.volume.normalize(self.shared.snapshot().volume)
    }

    pub fn frequency_range(&self) -> f32 {
        self.frequency_range
    }

    pub fn last_raw_distance(&self) -> Option<f32> {
        self.last_raw
    }

    pub fn smoothed_distance(&self) -> Option<f32> {
        self.last_smoothed
    }

    pub fn mapper(&self) -> &FrequencyMapper {
        &self.mapper
    }

    pub fn max_volume(&self) -> f32 {
        self.volume.max_volume
    }

    /// Silence the renderer for good. Idempotent; returns `true` on the call
    /// that actually stopped the engine.
    pub fn shutdown(&self) -> bool {
        self.shared.shut_down()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.is_shut_down()
    }
}

/// Render half: owned by the audio callback.
#[derive(Debug)]
pub struct ToneRenderer {
    shared: Arc<SharedParams>,
    osc: OscillatorBlock,
}

impl ToneRenderer {
    /// Fill an interleaved buffer of `out.len() / channels` frames.
    ///
    /// Frequency and volume are read once, before the first frame, and held
    /// for the whole buffer. Returns the values used. After shutdown the
    /// buffer is filled with silence.
    pub fn render(&mut self, out: &mut [f32], channels: usize) -> ToneParams {
        let params = self.shared.snapshot();
        let stopped = self.shared.is_shut_down();
        self.fill(out, channels, params, stopped);
        params
    }

    /// Same as [`render`](Self::render), also pushing the mono signal (first
    /// channel of each frame) into `tap`.
    pub fn render_with_tap<S: SampleSink>(
        &mut self,
        out: &mut [f32],
        channels: usize,
        tap: &mut S,
    ) -> ToneParams {
        let params = self.render(out, channels);
        push_first_channel(out, channels, tap);
        params
    }

    /// Render a device buffer of any length through `scratch`.
    ///
    /// `data` is filled one scratch-sized block at a time, each block
    /// converted with `convert` and tapped like
    /// [`render_with_tap`](Self::render_with_tap). The parameters and the
    /// shutdown flag are read once up front and reused for every block, so
    /// the whole device buffer plays a single frequency/volume pair.
    ///
    /// A scratch buffer too short for one frame yields silence.
    pub fn render_blocks<T, S, F>(
        &mut self,
        data: &mut [T],
        scratch: &mut [f32],
        channels: usize,
        tap: &mut S,
        convert: F,
    ) -> ToneParams
    where
        S: SampleSink,
        F: Fn(f32) -> T,
    {
        let params = self.shared.snapshot();
        let stopped = self.shared.is_shut_down();

        let channels = channels.max(1);
        let block_len = scratch.len() - scratch.len() % channels;
        if block_len == 0 {
            for out in data.iter_mut() {
                *out = convert(0.0);
            }
            return params;
        }

        for chunk in data.chunks_mut(block_len) {
            let block = &mut scratch[..chunk.len()];
            self.fill(block, channels, params, stopped);
            push_first_channel(block, channels, tap);
            for (out, &sample) in chunk.iter_mut().zip(block.iter()) {
                *out = convert(sample);
            }
        }
        params
    }

    fn fill(&mut self, out: &mut [f32], channels: usize, params: ToneParams, stopped: bool) {
        if stopped {
            out.fill(0.0);
            return;
        }
        self.osc
            .render_interleaved(out, channels, params.frequency, params.volume);
    }

    pub fn sample_rate(&self) -> f32 {
        self.osc.sample_rate()
    }

    /// Oscillator phase in radians, in `[0, 2π)`.
    pub fn phase(&self) -> f64 {
        self.osc.phase()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.is_shut_down()
    }
}

fn push_first_channel<S: SampleSink>(out: &[f32], channels: usize, tap: &mut S) {
    for frame in out.chunks_exact(channels.max(1)) {
        tap.push(frame[0]);
    }
}

/// Both halves of the engine, before they are handed to their threads.
///
/// Usable directly from a single thread (offline rendering, tests).
#[derive(Debug)]
pub struct ThereminEngine {
    control: ToneControl,
    renderer: ToneRenderer,
}

impl ThereminEngine {
    /// Build an engine for `sample_rate` Hz. The rate is fixed for the
    /// engine's lifetime; a non-positive rate falls back to 48 kHz, and a
    /// mapper with unplayable bounds falls back to the default one.
    pub fn new(sample_rate: f32, config: EngineConfig) -> Self {
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };

        let volume = VolumeMapper::new(config.max_volume);
        let mapper = config.mapper.validated();
        let shared = Arc::new(SharedParams::new(ToneParams::new(
            config.initial_frequency,
            volume.map(config.initial_volume),
        )));

        Self {
            control: ToneControl {
                shared: Arc::clone(&shared),
                window: SmoothingWindow::new(config.window_size),
                mapper,
                volume,
                frequency_range: mapper.sanitize_range(config.frequency_range),
                last_raw: None,
                last_smoothed: None,
            },
            renderer: ToneRenderer {
                shared,
                osc: OscillatorBlock::new(sample_rate),
            },
        }
    }

    /// Separate the control and render halves.
    pub fn split(self) -> (ToneControl, ToneRenderer) {
        (self.control, self.renderer)
    }

    pub fn control(&self) -> &ToneControl {
        &self.control
    }

    pub fn renderer(&self) -> &ToneRenderer {
        &self.renderer
    }

    pub fn on_distance_sample(&mut self, meters: f32) -> Option<f32> {
        self.control.on_distance_sample(meters)
    }

    pub fn on_ranging_update(&mut self, reading: Option<f32>) -> Option<f32> {
        self.control.on_ranging_update(reading)
    }

    pub fn on_volume_change(&mut self, normalized: f32) {
        self.control.on_volume_change(normalized);
    }

    pub fn on_frequency_range_change(&mut self, multiplier: f32) {
        self.control.on_frequency_range_change(multiplier);
    }

    pub fn set_frequency(&self, frequency: f32) {
        self.control.set_frequency(frequency);
    }

    pub fn render(&mut self, out: &mut [f32], channels: usize) -> ToneParams {
        self.renderer.render(out, channels)
    }

    pub fn sample_rate(&self) -> f32 {
        self.renderer.sample_rate()
    }

    pub fn shutdown(&self) -> bool {
        self.control.shutdown()
    }
}
