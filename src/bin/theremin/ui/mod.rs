//! TUI module for theremin
//!
//! Drives the control half of the engine from the keyboard and the simulated
//! ranging peer, and shows what the audio thread is producing.

mod spectrum;
pub mod state;
mod status;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use theremin_dsp::{
    dsp::mapping::{FREQUENCY_RANGE_MAX, FREQUENCY_RANGE_MIN},
    ToneControl,
};

use crate::ranging::SimulatedRanging;

pub use state::StatusSnapshot;

use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size (also the FFT size)
const VIS_BUFFER_SIZE: usize = 2048;

/// ~60fps
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const HAND_STEP: f32 = 0.02;
const VOLUME_STEP: f32 = 0.05;
const RANGE_STEP: f32 = 0.1;

/// UI application state
pub struct UiApp<'a> {
    control: &'a mut ToneControl,
    ranging: &'a mut SimulatedRanging,
    /// Mono copy of the output, if audio is running
    audio_rx: Option<Consumer<f32>>,
    /// Latest samples for the scope
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    audio_running: bool,
    should_quit: bool,
}

impl<'a> UiApp<'a> {
    pub fn new(
        control: &'a mut ToneControl,
        ranging: &'a mut SimulatedRanging,
        audio_rx: Option<Consumer<f32>>,
        sample_rate: f32,
    ) -> Self {
        let audio_running = audio_rx.is_some();
        Self {
            control,
            ranging,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            audio_running,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last_tick = Instant::now();

        while !self.should_quit {
            let now = Instant::now();
            let dt = now - last_tick;
            last_tick = now;

            // Feed the engine from the ranging peer
            let reading = self.ranging.poll(dt);
            self.control.on_ranging_update(reading);

            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(FRAME_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Pull new samples from the ring buffer, keeping the last VIS_BUFFER_SIZE
    fn poll_audio(&mut self) {
        let Some(rx) = self.audio_rx.as_mut() else {
            return;
        };

        let available = rx.slots();
        if available == 0 {
            return;
        }
        if let Ok(chunk) = rx.read_chunk(available) {
            let (first, second) = chunk.as_slices();
            self.audio_buffer.extend_from_slice(first);
            self.audio_buffer.extend_from_slice(second);
            chunk.commit_all();
        }

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => self.ranging.nudge(HAND_STEP),
            KeyCode::Down => self.ranging.nudge(-HAND_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_volume(VOLUME_STEP),
            KeyCode::Char('-') => self.step_volume(-VOLUME_STEP),
            KeyCode::Char(']') => self.step_range(RANGE_STEP),
            KeyCode::Char('[') => self.step_range(-RANGE_STEP),
            KeyCode::Char('c') => {
                self.ranging.toggle_connection();
                info!(connected = self.ranging.is_connected(), "ranging peer toggled");
            }
            KeyCode::Char('s') => self.ranging.toggle_sweep(),
            _ => {}
        }
    }

    fn step_volume(&mut self, delta: f32) {
        let volume = (self.control.normalized_volume() + delta).clamp(0.0, 1.0);
        self.control.on_volume_change(volume);
        debug!(volume, "volume changed");
    }

    fn step_range(&mut self, delta: f32) {
        let range = (self.control.frequency_range() + delta)
            .clamp(FREQUENCY_RANGE_MIN, FREQUENCY_RANGE_MAX);
        self.control.on_frequency_range_change(range);
        debug!(range, "frequency range changed");
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::capture(
            &*self.control,
            &*self.ranging,
            self.sample_rate,
            self.audio_running,
        )
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let snapshot = self.snapshot();

        // Main layout: status, waveform, spectrum, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),  // Status
                Constraint::Min(8),     // Waveform
                Constraint::Length(10), // Spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(frame, chunks[0], &snapshot, &stats);

        // Show a few cycles of the tone rather than the whole buffer
        let cycle = (self.sample_rate / snapshot.params.frequency.max(1.0)) as usize;
        let window = (cycle * 4).clamp(64, self.audio_buffer.len().max(64));
        let start = self.audio_buffer.len().saturating_sub(window);
        render_waveform(
            frame,
            chunks[1],
            &self.audio_buffer[start..],
            self.control.max_volume(),
        );

        render_spectrum(
            frame,
            chunks[2],
            self.spectrum.data(),
            self.spectrum.dominant_frequency(),
        );

        let help = Paragraph::new(
            " [↑/↓] Hand  [+/-] Volume  [ [/] ] Range  [C] Connect  [S] Sweep  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
