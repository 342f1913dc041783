//! Facade crate for the Bedrock foundation crates.
//! Re-exports every subsystem under a short module name and registers the built-in
//! configuration models.
//! Keep this crate thin: it should compose other crates, not implement behaviour.
//!
//! ## Usage
//! - Add `bedrock` with the desired feature flags (`cli`, `crypto`, `logger` or `full`).
//! - Call [`init`] once at startup to register built-in configs in the global registry.

pub use bedrock_config as config;
pub use bedrock_errors as errors;
pub use bedrock_ini as ini;
pub use bedrock_transport as transport;

#[cfg(feature = "cli")]
pub use bedrock_cli as cli;
#[cfg(feature = "crypto")]
pub use bedrock_crypto as crypto;
#[cfg(feature = "logger")]
pub use bedrock_logger as logger;

pub use bedrock_config::{ConfigModel, ConfigRegistry, ConfigSource, Tracked};
pub use bedrock_errors::{FoundationError, FoundationErrorExt};

/// Build-time enabled subsystems.
pub mod features {
    /// Subsystems compiled into this build (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "config",
        "errors",
        "ini",
        "transport",
        #[cfg(feature = "cli")]
        "cli",
        #[cfg(feature = "crypto")]
        "crypto",
        #[cfg(feature = "logger")]
        "logger",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Registers the built-in configuration models in [`ConfigRegistry::global`].
///
/// Safe to call more than once. Returns the names this call added.
///
/// # Errors
/// Returns [`bedrock_config::ConfigError::Registry`] if a built-in name is already taken by
/// another model type.
pub fn init() -> Result<Vec<&'static str>, bedrock_config::ConfigError> {
    let mut registered = Vec::new();

    if transport::register_default()? {
        registered.push(transport::TRANSPORT_CONFIG_NAME);
    }

    Ok(registered)
}
