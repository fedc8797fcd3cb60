//! Log file setup
//!
//! The terminal belongs to the UI, so events only ever go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{config_dir, LogConfig};

/// Keeps the background writer alive; dropping it flushes the log
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Where the log goes for `config`
pub fn log_path(config: &LogConfig) -> PathBuf {
    if !config.file.trim().is_empty() {
        return PathBuf::from(&config.file);
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ferret.log")
}

/// Install the global subscriber. Failures are reported on stderr before the
/// UI starts and leave logging off.
pub fn init_logging(config: &LogConfig) -> LogGuard {
    if !config.enabled {
        return LogGuard { _file_guard: None };
    }

    let path = log_path(config);
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(dir)
    {
        eprintln!("Warning: Could not create log directory {}: {}", dir.display(), e);
        return LogGuard { _file_guard: None };
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Could not open log file {}: {}", path.display(), e);
            return LogGuard { _file_guard: None };
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_ansi(false)
        .with_writer(writer);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Warning: Could not install logger: {}", e);
        return LogGuard { _file_guard: None };
    }

    info!(path = %path.display(), "logging started");
    LogGuard { _file_guard: Some(guard) }
}
