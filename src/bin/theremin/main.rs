//! theremin - play the tone engine from the terminal
//!
//! Run with: cargo run -- --help

mod app;
mod cli;
mod output;
mod ranging;
mod ui;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::{fs::File, sync::Mutex};
use tracing_subscriber::EnvFilter;

use app::Theremin;
use cli::Args;
use ranging::SimulatedRanging;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(&args)?;

    let ranging = SimulatedRanging::new(args.jitter)
        .with_connected(!args.disconnected)
        .with_sweep(args.headless || args.sweep);

    let theremin = Theremin::new(args.engine_config()).ranging(ranging);
    if args.headless {
        theremin.headless(args.duration()).run()
    } else {
        theremin.run()
    }
}

/// Headless runs log to stderr. The TUI owns the terminal, so it logs to a
/// file instead.
fn init_tracing(args: &Args) -> EyreResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = File::create(&args.log_file)
            .wrap_err_with(|| format!("failed to create log file {}", args.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}
