use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The origin that supplied a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigSource {
    /// Built-in or registered default.
    Default,
    /// A configuration file.
    File { path: PathBuf },
    /// Process environment variables.
    Environment,
    /// A runtime override, including command-line input.
    Override,
}

impl ConfigSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::File { path } => write!(f, "file:{}", path.display()),
            Self::Environment => f.write_str("environment"),
            Self::Override => f.write_str("override"),
        }
    }
}
