mod analysis;
mod benchmark;
mod budget;
mod categorize;
mod config;
mod grouping;
mod import;
mod models;
mod run;
mod session;
mod ui;

use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;

    let tui = matches!(args.get(1).map(String::as_str), None | Some("tui"));
    if tui {
        init_file_logging(&config.log_path())?;
    } else {
        init_stderr_logging();
    }
    tracing::debug!(data_dir = %config.data_dir().display(), "using data directory");

    if tui {
        run::as_tui(args.get(2..).unwrap_or_default(), config)
    } else {
        run::as_cli(&args, config)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "weekspend=info".into())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// The alternate screen owns the terminal, so the TUI logs to a file.
fn init_file_logging(path: &std::path::Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
