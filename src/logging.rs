use crate::persistence::log_dir;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PREFIX: &str = "tomatodo.log";

/// Send tracing output to a daily log file under the data directory.
/// The TUI owns the terminal, so nothing is written to stdout or stderr.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(data_dir: &Path) -> Result<WorkerGuard> {
    let dir = log_dir(data_dir);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(guard)
}
