use std::{env, io};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{Builder, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    BridgeError, Result,
    config::{ConfigPaths, GeneralConfig, LogLevel},
};

const DAYS_TO_KEEP: usize = 7;
const FORMAT_VAR: &str = "TAB_BRIDGE_LOG_FORMAT";

/// Initialize tracing for host mode
///
/// Logs to stderr, since stdout carries the browser protocol, and to a daily
/// rolling file in the state log directory when `log_to_file` is set.
/// Uses RUST_LOG if set, otherwise the configured level. The console format
/// is chosen by TAB_BRIDGE_LOG_FORMAT (`json` or `pretty`).
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the life of the process.
///
/// # Errors
/// Returns error if the log directory cannot be created or a subscriber is
/// already installed
pub fn init_host(general: &GeneralConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = if general.log_to_file {
        let log_dir = ConfigPaths::log_dir()?;
        let file_appender = Builder::new()
            .rotation(Rotation::DAILY)
            .max_log_files(DAYS_TO_KEEP)
            .filename_prefix("tab-bridge")
            .filename_suffix("log")
            .build(&log_dir)
            .map_err(|e| BridgeError::Logging(e.to_string()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .compact()
            .with_target(true)
            .with_level(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let console_layer = match log_format().as_str() {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .boxed(),
        _ => fmt::layer()
            .pretty()
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter(general.log_level))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BridgeError::Logging(e.to_string()))?;

    Ok(guard)
}

/// Initialize tracing for CLI commands
///
/// Only warnings and errors, compact, to stderr, so command output on
/// stdout stays clean.
///
/// # Errors
/// Returns error if a subscriber is already installed
pub fn init_cli_mode() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(LogLevel::Warn))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init()
        .map_err(|e| BridgeError::Logging(e.to_string()))
}

fn env_filter(fallback: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback.to_string()))
}

fn log_format() -> String {
    env::var(FORMAT_VAR).unwrap_or_else(|_| "pretty".to_string())
}
