//! File logging.
//!
//! The terminal belongs to the UI, so logs only go to a daily-rotated file
//! under the platform data directory (`~/.local/share/cohort/logs` on Linux).

use crate::config::LoggingConfig;
use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

const MAX_LOG_FILES: usize = 7;

/// Log directory: the configured one, else the platform data dir.
pub fn log_dir(config: &LoggingConfig) -> Result<PathBuf> {
    if let Some(dir) = &config.directory {
        return Ok(dir.clone());
    }
    let proj = ProjectDirs::from("", "", "cohort").context("Failed to determine data directory")?;
    Ok(proj.data_dir().join("logs"))
}

/// Level precedence: `--log-level`, then `RUST_LOG`, then the config file,
/// then `info`.
fn env_filter(cli_level: Option<&str>, config: &LoggingConfig) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {level}"));
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.as_deref().unwrap_or("info")))
        .context("Failed to create env filter")
}

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init(cli_level: Option<&str>, config: &LoggingConfig) -> Result<WorkerGuard> {
    let filter = env_filter(cli_level, config)?;
    let dir = log_dir(config)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix("cohort")
        .filename_suffix("log")
        .build(&dir)
        .context("Failed to create log file appender")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), log_dir = %dir.display(), "logging initialized");
    Ok(guard)
}
