//! Application log bootstrap.
//!
//! Logs go to rotating files in the configured directory, never to the
//! terminal, so they do not interleave with the interactive shell.

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "remindcal";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start file logging. Keep the returned handle alive for the whole run;
/// dropping it flushes and stops the logger.
pub fn init(level: &str, log_dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Could not create log directory {}", log_dir.display()))?;

    let handle = Logger::try_with_str(level)
        .with_context(|| format!("Invalid log level '{level}'"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logger")?;

    info!(
        "remindcal {} started, log level {level}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}
