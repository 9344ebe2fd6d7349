//! Per-frame view of the instrument for the widgets
//!
//! Captured once per draw so every widget shows the same moment.

use theremin_dsp::{engine::ToneParams, ToneControl};

use crate::ranging::SimulatedRanging;

#[derive(Clone, Copy, Debug)]
pub struct StatusSnapshot {
    /// Whether the ranging peer is reporting
    pub connected: bool,
    /// Whether the simulated hand is sweeping on its own
    pub sweeping: bool,
    /// Simulated hand position before jitter (meters)
    pub hand: f32,
    /// Latest raw distance (meters)
    pub raw_distance: Option<f32>,
    /// Latest smoothed distance (meters)
    pub smoothed_distance: Option<f32>,
    /// Frequency and engine volume as published to the renderer
    pub params: ToneParams,
    /// Volume on the 0..1 control scale
    pub normalized_volume: f32,
    pub frequency_range: f32,
    /// Reachable pitch span for the current range (Hz)
    pub span: (f32, f32),
    pub sample_rate: f32,
    pub audio_running: bool,
}

impl StatusSnapshot {
    pub fn capture(
        control: &ToneControl,
        ranging: &SimulatedRanging,
        sample_rate: f32,
        audio_running: bool,
    ) -> Self {
        Self {
            connected: ranging.is_connected(),
            sweeping: ranging.is_sweeping(),
            hand: ranging.hand(),
            raw_distance: ranging.last_reading(),
            smoothed_distance: control.smoothed_distance(),
            params: control.params(),
            normalized_volume: control.normalized_volume(),
            frequency_range: control.frequency_range(),
            span: control.mapper().bounds(control.frequency_range()),
            sample_rate,
            audio_running: audio_running && !control.is_shut_down(),
        }
    }
}
