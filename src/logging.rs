//! Tracing subscriber setup.
//!
//! Console output is human-readable by default and JSON lines with
//! `LOG_FORMAT=json`. With `LOG_DIR` set, the same events also go to a daily
//! rolling `scraper.<date>.log` file. `RUST_LOG` overrides the `info` default.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "scraper";
const LOG_FILE_SUFFIX: &str = "log";

/// Logging failed to initialize.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log directory or file could not be created.
    #[error("could not open log file: {0}")]
    Appender(#[from] InitError),

    /// A global subscriber is already installed.
    #[error("could not install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Where and how to log.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Emit JSON lines instead of text.
    pub json: bool,
    /// Directory for the rolling log file.
    pub log_dir: Option<PathBuf>,
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the life of the process, otherwise
/// buffered file output is lost.
///
/// # Errors
///
/// Returns [`LogError`] if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>, LogError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = config.json.then(|| fmt::layer().json());
    let text_layer = (!config.json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
}
