//! Logging setup for the news job and its integration tests.
//!
//! Every run appends to a daily rolling file, optionally mirrored to stderr.
//! Call [`init_logging`] once near process start; later calls are no-ops.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used for the default directory and the log file prefix.
    pub app_name: &'static str,
    /// Where log files go. `None` means `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Mirror events to `stderr` as well as the file.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "pulse",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Install the global `tracing` subscriber and log where the file sink is.
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let prefix = format!("{}.log", config.app_name);
    let log_file = log_file_path(&dir, &prefix, Utc::now());
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &prefix));

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.as_str()));

    let json = config.format == LogFormat::Json;
    let mirror = config.emit_stderr;

    tracing_subscriber::registry()
        .with(env_filter)
        .with((!json).then(|| fmt::layer().with_writer(writer.clone()).with_ansi(false)))
        .with(json.then(|| fmt::layer().json().with_writer(writer)))
        .with((mirror && !json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with((mirror && json).then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_GUARD.set(guard);
    tracing::info!(log_file = %log_file.display(), "logging initialised");
    Ok(())
}

/// `rolling::daily` suffixes the prefix with the UTC date.
fn log_file_path(dir: &Path, prefix: &str, now: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{prefix}.{}", now.format("%Y-%m-%d")))
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => expand_home(dir),
        None => default_data_dir(app_name),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app_name: &str) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local/share").join(app_name),
        Err(_) => PathBuf::from(".").join(app_name),
    }
}
