use anyhow::{Context, Result};
use bedrock::config::{ConfigLoader, ConfigRegistry, ConfigSource};
use bedrock::transport::{TRANSPORT_CONFIG_NAME, TransportConfig};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Splits `path=value`; the value is read as JSON when it parses, else as a string.
fn parse_assignment(assignment: &str) -> Result<(&str, Value)> {
    let (path, raw) = assignment
        .split_once('=')
        .with_context(|| format!("Expected PATH=VALUE, got '{assignment}'"))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok((path.trim(), value))
}

pub fn show_transport(config: Option<&Path>, sets: &[String], changes: bool) -> Result<()> {
    bedrock::init()?;
    let defaults = ConfigRegistry::global()
        .defaults(TRANSPORT_CONFIG_NAME)
        .context("Transport config is not registered")?;

    let mut loader = ConfigLoader::<TransportConfig>::new().defaults(defaults);
    if let Some(path) = config {
        loader = loader.file(path);
    }
    let mut transport = loader.load()?;

    for assignment in sets {
        let (path, value) = parse_assignment(assignment)?;
        debug!(path, %value, "Applying override");
        transport
            .set(path, value, ConfigSource::Override)
            .with_context(|| format!("Failed to apply --set {assignment}"))?;
    }

    if changes {
        println!("{}", serde_json::to_string_pretty(&transport.changes())?);
        return Ok(());
    }
    for field in transport.fields() {
        println!("{} = {} ({})", field.path, field.value, field.source);
    }
    Ok(())
}
