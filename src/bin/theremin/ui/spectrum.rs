//! Spectrum widget
//!
//! FFT of the scope buffer on log-spaced display bins, plus a readout of the
//! strongest frequency so the heard pitch can be checked against the mapping.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use theremin_dsp::dsp::mapping::{BASE_MAX_FREQUENCY, BASE_MIN_FREQUENCY};

/// Number of display bins
const SPECTRUM_BINS: usize = 64;

/// Display span: one octave either side of the widest mapping
const DISPLAY_MIN_HZ: f32 = BASE_MIN_FREQUENCY / 4.0;
const DISPLAY_MAX_HZ: f32 = BASE_MAX_FREQUENCY * 4.0;

/// Below this the buffer is treated as silence
const SILENCE_DB: f64 = -60.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin index for each display bin
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude dB) per display bin
    spectrum: Vec<(f64, f64)>,
    /// Strongest component, if above the silence floor
    dominant: Option<f32>,
    sample_rate: f32,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        // Hann window - reduces spectral leakage
        let denom = (buffer_len - 1) as f32;
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let half = buffer_len / 2;
        let max_hz = DISPLAY_MAX_HZ.min(sample_rate / 2.0);
        let ratio = (max_hz / DISPLAY_MIN_HZ).max(1.0) as f64;

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = DISPLAY_MIN_HZ as f64 * ratio.powf(t);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.min(half - 1));
            spectrum.push((freq.log10(), -120.0));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
            dominant: None,
            sample_rate,
        }
    }

    /// Recompute from `buffer`. Ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let power = |c: Complex<f32>| ((c.re * c.re + c.im * c.im) as f64).max(1e-12);
        // Normalize so a full-scale sine lands near 0 dB
        let scale = (self.window.len() as f64 / 4.0).powi(2);

        for (point, &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            point.1 = 10.0 * (power(self.scratch[index]) / scale).log10();
        }

        // Strongest bin (skipping DC), refined by parabolic interpolation
        let half = self.scratch.len() / 2;
        let (peak, peak_power) = (1..half)
            .map(|i| (i, power(self.scratch[i])))
            .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        self.dominant = if peak == 0 || 10.0 * (peak_power / scale).log10() < SILENCE_DB {
            None
        } else {
            let at = |i: usize| power(self.scratch[i]).ln();
            let offset = if peak + 1 < half {
                let (l, c, r) = (at(peak - 1), at(peak), at(peak + 1));
                let denom = l - 2.0 * c + r;
                if denom.abs() > f64::EPSILON {
                    (0.5 * (l - r) / denom).clamp(-0.5, 0.5)
                } else {
                    0.0
                }
            } else {
                0.0
            };
            let bin_hz = self.sample_rate as f64 / self.scratch.len() as f64;
            Some(((peak as f64 + offset) * bin_hz) as f32)
        };
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    pub fn dominant_frequency(&self) -> Option<f32> {
        self.dominant
    }
}

/// Render the spectrum on a log-frequency axis
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)], dominant: Option<f32>) {
    let title = match dominant {
        Some(hz) => format!(" Spectrum  peak ≈ {hz:.0} Hz "),
        None => " Spectrum ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (x_min, x_max) = spectrum
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(vec![
                    format!("{:.0}", 10f64.powf(x_min)),
                    format!("{:.0}", 10f64.powf(x_max)),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-100.0, 10.0])
                .labels(vec!["-100", "-45", "10"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use theremin_dsp::{EngineConfig, ThereminEngine};

    #[test]
    fn finds_engine_pitch() {
        let sample_rate = 48_000.0;
        let mut engine = ThereminEngine::new(sample_rate, EngineConfig::default());
        engine.on_volume_change(1.0);
        let expected = engine.on_distance_sample(0.55).unwrap();

        let mut buffer = vec![0.0f32; 2048];
        engine.render(&mut buffer, 1);

        let mut analyzer = SpectrumAnalyzer::new(2048, sample_rate);
        analyzer.update(&buffer);
        let found = analyzer.dominant_frequency().unwrap();
        // bin width is ~23 Hz; interpolation gets well inside one bin
        assert!((found - expected).abs() < 5.0, "found {found}, expected {expected}");
    }

    #[test]
    fn silence_has_no_peak() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 48_000.0);
        analyzer.update(&vec![0.0; 1024]);
        assert_eq!(analyzer.dominant_frequency(), None);
    }

    #[test]
    fn mismatched_length_is_ignored() {
        let mut analyzer = SpectrumAnalyzer::new(1024, 48_000.0);
        analyzer.update(&[0.5; 10]);
        assert_eq!(analyzer.dominant_frequency(), None);
        assert!(analyzer.data().iter().all(|&(_, db)| db == -120.0));
    }
}
