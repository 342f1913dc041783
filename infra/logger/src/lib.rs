//! # Logger
//!
//! Installs the global `tracing` subscriber from a [`LoggingConfig`]: a compact console
//! layer, an optional non-blocking rolling file appender and optional JSON output, all
//! behind an `EnvFilter` built from the configured directives (or `RUST_LOG`).
//!
//! Because [`LoggingConfig`] is a config model, it can be loaded from files and environment
//! with `bedrock_config::ConfigLoader` before the logger starts.
//!
//! ## Example
//!
//! ```rust
//! use bedrock_logger::{Logger, LoggingConfig};
//!
//! let config = LoggingConfig { level: "debug".into(), ..LoggingConfig::default() };
//! let _logger = Logger::init(&config)?;
//! tracing::debug!("ready");
//! # Ok::<(), bedrock_logger::LoggerError>(())
//! ```

mod config;
mod error;

pub use crate::config::{LogRotation, LoggingConfig};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use bedrock_config::ConfigModel;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_SUFFIX: &str = "log";

/// A handle to the initialized logging system.
///
/// Holds the background worker guard of the file appender. Drop it only when the
/// application is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Validates `config` and installs the global tracing subscriber.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] if `config` fails validation,
    /// [`LoggerError::Appender`] if the log directory cannot be used and
    /// [`LoggerError::Subscriber`] if a global subscriber has already been set.
    pub fn init(config: &LoggingConfig) -> Result<Self, LoggerError> {
        config.validate()?;
        let env_filter = config.env_filter()?;

        let mut layers = Vec::new();

        if config.console {
            let console = layer().with_ansi(true);
            layers.push(if config.json { console.json().boxed() } else { console.compact().boxed() });
        }

        let guard = if let Some(directory) = &config.directory {
            fs::create_dir_all(directory).map_err(|e| LoggerError::Internal {
                message: e.to_string().into(),
                context: Some(format!("Failed to create path: {}", directory.display()).into()),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(config.rotation.into())
                .filename_prefix(&config.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(config.max_files)
                .build(directory)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file = layer().with_writer(non_blocking).with_ansi(false);
            layers.push(if config.json { file.json().boxed() } else { file.boxed() });
            Some(guard)
        } else {
            None
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;
        tracing::debug!(
            name = %config.name,
            level = %config.level,
            file = guard.is_some(),
            "Logger initialized"
        );

        Ok(Self { guard })
    }

    /// Returns a reference to the file appender's worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}
