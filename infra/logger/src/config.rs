use bedrock_config::ConfigModel;
use bedrock_errors::FoundationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_FILES: usize = 10;

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Self::MINUTELY,
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

/// Logging settings, loadable and trackable like any other config model.
///
/// `filter` takes `EnvFilter` directives (`bedrock_config=debug,info`). When unset,
/// `RUST_LOG` is consulted and `level` is the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Prefix of rolling log files (`<name>.<date>.log`).
    pub name: String,
    pub level: String,
    pub filter: Option<String>,
    pub console: bool,
    pub json: bool,
    /// Directory of the rolling file appender; no file output when unset.
    pub directory: Option<PathBuf>,
    pub rotation: LogRotation,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "bedrock".to_owned(),
            level: "info".to_owned(),
            filter: None,
            console: true,
            json: false,
            directory: None,
            rotation: LogRotation::Daily,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl LoggingConfig {
    /// The parsed [`Self::level`].
    ///
    /// # Errors
    /// Returns [`FoundationError::Validation`] for an unknown level name.
    pub fn level_filter(&self) -> Result<LevelFilter, FoundationError> {
        LevelFilter::from_str(self.level.trim()).map_err(|_| {
            FoundationError::validation(
                "level",
                format!("unknown level '{}', expected off, error, warn, info, debug or trace", self.level),
            )
        })
    }

    pub(crate) fn env_filter(&self) -> Result<EnvFilter, FoundationError> {
        let builder = EnvFilter::builder().with_default_directive(self.level_filter()?.into());
        self.filter.as_ref().map_or_else(
            || Ok(builder.from_env_lossy()),
            |filter| {
                builder.parse(filter).map_err(|e| {
                    FoundationError::validation("filter", format!("invalid filter '{filter}': {e}"))
                })
            },
        )
    }
}

impl ConfigModel for LoggingConfig {
    fn validate(&self) -> Result<(), FoundationError> {
        if self.name.trim().is_empty() {
            return Err(FoundationError::validation("name", "cannot be empty"));
        }
        if self.max_files == 0 {
            return Err(FoundationError::validation("max_files", "must be greater than zero"));
        }
        if !self.console && self.directory.is_none() {
            return Err(FoundationError::validation(
                "console",
                "no output enabled, enable the console or set a directory",
            ));
        }
        self.env_filter().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LoggingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.level_filter().unwrap(), LevelFilter::INFO);
    }

    #[test]
    fn invalid_settings_name_the_field() {
        let cases = [
            (LoggingConfig { name: " ".into(), ..LoggingConfig::default() }, "name"),
            (LoggingConfig { level: "loud".into(), ..LoggingConfig::default() }, "level"),
            (LoggingConfig { max_files: 0, ..LoggingConfig::default() }, "max_files"),
            (LoggingConfig { console: false, ..LoggingConfig::default() }, "console"),
            (
                LoggingConfig { filter: Some("bedrock=[".into()), ..LoggingConfig::default() },
                "filter",
            ),
        ];

        for (config, field) in cases {
            let err = config.validate().unwrap_err();
            assert_eq!(err.details()["field"], field, "{err}");
        }
    }

    #[test]
    fn rotation_maps_onto_appender_rotation() {
        assert_eq!(Rotation::from(LogRotation::Hourly), Rotation::HOURLY);
        assert_eq!(Rotation::from(LogRotation::default()), Rotation::DAILY);
    }
}
