use bedrock_errors::FoundationError;
use std::borrow::Cow;

/// Errors raised while loading, tracking or registering configuration.
#[bedrock_derive::bedrock_error]
pub enum ConfigError {
    /// A file or environment layer could not be read or parsed.
    #[code = "CONFIG_LOAD"]
    #[error("Config error{}: {source}", format_context(.context))]
    Load { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// An INI layer could not be read or parsed.
    #[code = "CONFIG_INI"]
    #[error("INI config error{}: {source}", format_context(.context))]
    Ini { source: bedrock_ini::IniError, context: Option<Cow<'static, str>> },

    /// A model could not be converted to or from its dictionary form.
    #[code = "CONFIG_SERDE"]
    #[error("Config serialization error{}: {source}", format_context(.context))]
    Serde { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The resulting configuration violates the model (unknown field, wrong type, failed check).
    #[code = "CONFIG_INVALID"]
    #[error("Invalid configuration{}: {source}", format_context(.context))]
    Invalid { source: FoundationError, context: Option<Cow<'static, str>> },

    /// Registry misuse: duplicate names, unknown names or type mismatches.
    #[code = "CONFIG_REGISTRY"]
    #[error("Config registry error{}: {message}", format_context(.context))]
    Registry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[code = "CONFIG_INTERNAL"]
    #[error("Internal config error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ConfigError {
    /// Shorthand for a [`FoundationError::Validation`] wrapped as [`ConfigError::Invalid`].
    pub fn validation(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        FoundationError::validation(field, message).into()
    }

    pub(crate) fn registry(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Registry { message: message.into(), context: None }
    }

    /// The taxonomy error behind an [`ConfigError::Invalid`] failure.
    #[must_use]
    pub const fn as_foundation(&self) -> Option<&FoundationError> {
        match self {
            Self::Invalid { source, .. } => Some(source),
            _ => None,
        }
    }
}
