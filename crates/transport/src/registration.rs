use crate::config::TransportConfig;
use bedrock_config::{ConfigError, ConfigRegistry, serde_loader};
use serde_json::Value;
use tracing::debug;

/// Registry name of [`TransportConfig`].
pub const TRANSPORT_CONFIG_NAME: &str = "transport";

/// The nested default dictionary registered for [`TransportConfig`].
#[must_use]
pub fn default_values() -> Value {
    serde_json::to_value(TransportConfig::default()).unwrap_or(Value::Null)
}

/// Registers [`TransportConfig`] under [`TRANSPORT_CONFIG_NAME`] unless it is already there.
///
/// Returns `true` if this call added the entry.
///
/// # Errors
/// Returns [`ConfigError::Registry`] if the name is taken by another model type.
pub fn register_transport_config(registry: &ConfigRegistry) -> Result<bool, ConfigError> {
    let added = registry.register_if_absent(
        TRANSPORT_CONFIG_NAME,
        serde_loader::<TransportConfig>(),
        default_values(),
    )?;
    debug!(name = TRANSPORT_CONFIG_NAME, added, "Transport config registration");
    Ok(added)
}

/// [`register_transport_config`] on the process-wide registry.
///
/// # Errors
/// See [`register_transport_config`].
pub fn register_default() -> Result<bool, ConfigError> {
    register_transport_config(ConfigRegistry::global())
}
