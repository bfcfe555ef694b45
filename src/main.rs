//! gba-shell - Game Boy Advance emulator front-end
//!
//! Main entry point for the application.

use anyhow::Context;
use gs_core::{logging, Config, LogSink};
use gs_ui::{app, ShellWindow};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    // Initialize logging
    let sink = LogSink::new();
    logging::init(config.debug.log_level, &sink).context("failed to initialize logging")?;

    tracing::info!("Starting gba-shell");
    tracing::debug!("Config file: {}", Config::config_path().display());

    let rom = std::env::args_os().nth(1).map(PathBuf::from);
    let shell = ShellWindow::new(config, sink).context("invalid configuration")?;

    // Run the application
    app::run(shell, rom).map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
