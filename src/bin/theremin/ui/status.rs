//! Status bar widget - shows connection, distance, pitch, levels and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::StatusSnapshot;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn meters(value: Option<f32>) -> String {
    value.map_or_else(|| "-".to_string(), |m| format!("{m:.3} m"))
}

/// Render the status bar
pub fn render_status(frame: &mut Frame, area: Rect, state: &StatusSnapshot, stats: &AudioStats) {
    let block = Block::default().title(" theremin ").borders(Borders::ALL);

    let (link_symbol, link_str, link_color) = if state.connected {
        ("●", "Connected", Color::Green)
    } else {
        ("○", "Waiting for peer", Color::Yellow)
    };
    let (audio_str, audio_color) = if state.audio_running {
        ("♪ Audio on", Color::Green)
    } else {
        ("✕ No audio", Color::Red)
    };

    let ranging_line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", link_symbol, link_str),
            Style::default().fg(link_color),
        ),
        Span::styled(
            format!("Hand: {:.2} m  ", state.hand),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Raw: {}  ", meters(state.raw_distance)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Smoothed: {}  ", meters(state.smoothed_distance)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            if state.sweeping { "Sweep" } else { "" },
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let tone_line = Line::from(vec![
        Span::styled(
            format!(" {:.1} Hz  ", state.params.frequency),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Vol: {:.0}%  ", state.normalized_volume * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "Range: ×{:.1} ({:.0}-{:.0} Hz)  ",
                state.frequency_range, state.span.0, state.span.1
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", state.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{}  ", audio_str), Style::default().fg(audio_color)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(vec![ranging_line, tone_line]).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_full_scale_sine() {
        let buffer: Vec<f32> = (0..480)
            .map(|i| 0.8 * (std::f32::consts::TAU * i as f32 / 48.0).sin())
            .collect();
        let stats = AudioStats::from_buffer(&buffer);
        assert!((stats.peak - 0.8).abs() < 1e-3);
        assert!((stats.rms - 0.8 / 2.0f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn stats_of_empty_buffer() {
        let stats = AudioStats::from_buffer(&[]);
        assert_eq!(stats.peak, 0.0);
        assert_eq!(stats.rms, 0.0);
    }
}
