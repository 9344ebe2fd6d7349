//! Theremin - composition root: builds the engine, wires it to the audio
//! device, the ranging peer and the UI, and tears everything down.

use color_eyre::eyre::Result as EyreResult;
use rtrb::{Consumer, RingBuffer};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use theremin_dsp::{EngineConfig, ThereminEngine, ToneControl, DEFAULT_SAMPLE_RATE};

use super::output::{AudioOutput, OutputDevice};
use super::ranging::SimulatedRanging;
use super::ui::UiApp;

/// Scope ring size in samples (~170ms at 48kHz)
const SCOPE_CAPACITY: usize = 8192;

/// Control rate for the headless loop
const HEADLESS_TICK: Duration = Duration::from_millis(20);
const HEADLESS_REPORT_EVERY: Duration = Duration::from_secs(1);

/// Main application builder
pub struct Theremin {
    config: EngineConfig,
    ranging: SimulatedRanging,
    headless: Option<Duration>,
}

impl Theremin {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ranging: SimulatedRanging::new(0.0),
            headless: None,
        }
    }

    /// Use this ranging peer instead of the default noiseless one
    pub fn ranging(mut self, ranging: SimulatedRanging) -> Self {
        self.ranging = ranging;
        self
    }

    /// Run without the TUI for `duration`
    pub fn headless(mut self, duration: Duration) -> Self {
        self.headless = Some(duration);
        self
    }

    /// Run the application until the user quits or the headless run ends.
    ///
    /// A missing or broken audio device is logged and the instrument keeps
    /// running silently.
    pub fn run(self) -> EyreResult<()> {
        let Self {
            config,
            mut ranging,
            headless,
        } = self;

        let device = match OutputDevice::open_default() {
            Ok(device) => Some(device),
            Err(err) => {
                error!(?err, "audio output unavailable, continuing without sound");
                None
            }
        };
        let sample_rate = device
            .as_ref()
            .map_or(DEFAULT_SAMPLE_RATE, OutputDevice::sample_rate);

        let engine = ThereminEngine::new(sample_rate, config);
        let (mut control, renderer) = engine.split();
        info!(
            sample_rate,
            window_size = config.window_size,
            frequency_range = control.frequency_range(),
            "engine ready"
        );

        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);
        let mut output = device.and_then(|device| {
            let channels = device.channels();
            match device.start(renderer, scope_tx) {
                Ok(output) => {
                    info!(channels, "rendering");
                    Some(output)
                }
                Err(err) => {
                    error!(?err, "failed to start audio output, continuing without sound");
                    None
                }
            }
        });
        let scope_rx = output.as_ref().map(|_| scope_rx);

        let result = match headless {
            Some(duration) => run_headless(&mut control, &mut ranging, duration),
            None => run_tui(&mut control, &mut ranging, scope_rx, sample_rate),
        };

        shutdown(&control, output.as_mut());
        result
    }
}

fn run_tui(
    control: &mut ToneControl,
    ranging: &mut SimulatedRanging,
    scope_rx: Option<Consumer<f32>>,
    sample_rate: f32,
) -> EyreResult<()> {
    let mut terminal = ratatui::init();
    let result = UiApp::new(control, ranging, scope_rx, sample_rate).run(&mut terminal);
    ratatui::restore();
    result
}

/// Sweep the simulated hand and log the tone once a second
fn run_headless(
    control: &mut ToneControl,
    ranging: &mut SimulatedRanging,
    duration: Duration,
) -> EyreResult<()> {
    info!(?duration, "running headless");
    let started = Instant::now();
    let mut last_report = started;
    let mut missed = 0u32;

    while started.elapsed() < duration {
        let reading = ranging.poll(HEADLESS_TICK);
        if control.on_ranging_update(reading).is_none() {
            missed += 1;
        }

        if last_report.elapsed() >= HEADLESS_REPORT_EVERY {
            let params = control.params();
            info!(
                distance = ?control.smoothed_distance(),
                frequency = params.frequency,
                volume = params.volume,
                "tone"
            );
            if missed > 0 {
                warn!(missed, "no distance from ranging peer");
                missed = 0;
            }
            last_report = Instant::now();
        }

        std::thread::sleep(HEADLESS_TICK);
    }

    Ok(())
}

/// Stop the renderer, then release the device. Both steps are idempotent.
fn shutdown(control: &ToneControl, output: Option<&mut AudioOutput>) {
    if control.shutdown() {
        info!("engine stopped");
    }
    if let Some(output) = output {
        output.shutdown();
        debug_assert!(!output.is_running());
    }
}
