//! Logging setup for the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "puffpuff.log";

/// Platform log directory.
///
/// - macOS: `~/Library/Caches/puffpuff/logs`
/// - Linux: `~/.cache/puffpuff/logs` (or `$XDG_CACHE_HOME/puffpuff/logs`)
/// - Windows: `%LOCALAPPDATA%\puffpuff\logs`
/// - Fallback: `/tmp/puffpuff/logs`
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "puffpuff")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/puffpuff"))
        .join("logs")
}

/// Install the global subscriber: stderr always, plus a file when `log_dir`
/// is given.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. The returned guard
/// flushes the file writer and must be held until exit.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("Log file: {}", dir.join(LOG_FILE).display());
    }

    Ok(guard)
}
