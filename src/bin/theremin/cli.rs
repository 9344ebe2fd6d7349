use clap::Parser;
use std::{path::PathBuf, time::Duration};

use theremin_dsp::{
    dsp::{mapping::DEFAULT_FREQUENCY_RANGE, smoothing::DEFAULT_WINDOW_SIZE},
    EngineConfig,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Distance readings averaged before mapping (1 disables smoothing)
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Initial volume, 0.0-1.0
    #[arg(long, default_value_t = 0.5)]
    pub volume: f32,

    /// Initial frequency range multiplier, 0.5-2.0
    #[arg(long, default_value_t = DEFAULT_FREQUENCY_RANGE)]
    pub frequency_range: f32,

    /// Run without the TUI, sweeping the simulated hand
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Headless run time in seconds
    #[arg(long, default_value_t = 10.0)]
    pub duration: f32,

    /// Start the TUI with the automatic sweep enabled
    #[arg(long, default_value_t = false)]
    pub sweep: bool,

    /// Ranging noise amplitude in meters
    #[arg(long, default_value_t = 0.01)]
    pub jitter: f32,

    /// Start with the simulated peer disconnected
    #[arg(long, default_value_t = false)]
    pub disconnected: bool,

    /// Log file used while the TUI owns the terminal
    #[arg(long, default_value = "theremin.log")]
    pub log_file: PathBuf,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_window_size(self.window_size)
            .with_initial_volume(self.volume)
            .with_frequency_range(self.frequency_range)
    }

    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.duration.max(0.0)).unwrap_or(Duration::MAX)
    }
}
