mod commands;
mod console;
mod logging;
mod render;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use remindcal_core::config::Config;
use remindcal_core::{Calendar, FileStore};
use std::path::PathBuf;
use std::sync::Arc;

use commands::Session;
use console::Console;

#[derive(Parser)]
#[command(name = "remindcal")]
#[command(version, about = "Manage calendar events and timed reminders from an interactive shell")]
struct Cli {
    /// Config file (defaults to ~/.config/remindcal/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Events file, overriding data_file from config
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log level, overriding log_level from config (e.g. "debug")
    #[arg(long)]
    log_level: Option<String>,

    /// Arm saved reminders that have not fired yet
    #[arg(long)]
    rearm: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    if let Some(data_file) = cli.data_file {
        cfg.data_file = data_file;
    }
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }

    let log_dir = cfg.log_path();
    let _logger = logging::init(&cfg.log_level, &log_dir)?;

    let data_path = cfg.data_path();
    let mut calendar = Calendar::new(
        Arc::new(FileStore::new(&data_path)),
        cfg.notification_buffer,
    )
    .with_pretty_json(cfg.pretty_json);
    calendar
        .load()
        .with_context(|| format!("Failed to load events from {}", data_path.display()))?;

    if cli.rearm {
        let armed = calendar.rearm_pending();
        println!("Re-armed {armed} reminders");
    }

    let console_log_path = cfg.console_log_path();
    let session = Session {
        calendar,
        console: Arc::new(Console::new(FileStore::new(&console_log_path))),
        data_path,
        console_log_path,
        log_dir,
    };

    shell::run(session).await
}
