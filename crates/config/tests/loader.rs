mod fixtures;

use bedrock_config::{ConfigError, ConfigLoader, ConfigSource, load_config};
use fixtures::ServiceConfig;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn layers_apply_in_order_with_their_sources() {
    let dir = TempDir::new().expect("temp dir");
    let toml = dir.path().join("service.toml");
    fs::write(&toml, "name = \"from-toml\"\nport = 9000\n\n[limits]\nmax_connections = 50\n")
        .expect("write toml");

    let config = ConfigLoader::<ServiceConfig>::new()
        .file(&toml)
        .env_source(env(&[("BEDROCK__PORT", "9100"), ("BEDROCK__DEBUG", "true"), ("HOME", "/root")]))
        .override_with(json!({ "limits": { "timeout": 2.5 } }))
        .load()
        .expect("load");

    assert_eq!(config.name, "from-toml");
    assert_eq!(config.port, 9100);
    assert!(config.debug);
    assert_eq!(config.limits.max_connections, 50);

    assert_eq!(config.source_of("name"), Some(&ConfigSource::file(&toml)));
    assert_eq!(config.source_of("limits.max_connections"), Some(&ConfigSource::file(&toml)));
    assert_eq!(config.source_of("port"), Some(&ConfigSource::Environment));
    assert_eq!(config.source_of("debug"), Some(&ConfigSource::Environment));
    assert_eq!(config.source_of("limits.timeout"), Some(&ConfigSource::Override));
    assert_eq!(config.source_of("tags"), Some(&ConfigSource::Default));

    let port = config.original_value("port").expect("port history");
    assert_eq!(port.value, Some(json!(8080)));
}

#[test]
fn nested_environment_keys_use_the_separator() {
    let config = ConfigLoader::<ServiceConfig>::new()
        .env_source(env(&[("BEDROCK__LIMITS__MAX_CONNECTIONS", "99")]))
        .load()
        .expect("load");

    assert_eq!(config.limits.max_connections, 99);
    assert_eq!(config.source_of("limits.max_connections"), Some(&ConfigSource::Environment));
}

#[test]
fn custom_prefix_ignores_other_variables() {
    let config = ConfigLoader::<ServiceConfig>::new()
        .env_prefix(Some("SVC"))
        .env_source(env(&[("SVC__PORT", "7000"), ("BEDROCK__PORT", "1")]))
        .load()
        .expect("load");

    assert_eq!(config.port, 7000);
}

#[test]
fn disabled_environment_layer_is_skipped() {
    let config = ConfigLoader::<ServiceConfig>::new()
        .env_prefix(None)
        .env_source(env(&[("BEDROCK__PORT", "7000")]))
        .load()
        .expect("load");

    assert_eq!(config.port, 8080);
    assert_eq!(config.source_of("port"), Some(&ConfigSource::Default));
}

#[test]
fn ini_and_json_files_are_layered() {
    let dir = TempDir::new().expect("temp dir");
    let ini = dir.path().join("base.ini");
    let json_file = dir.path().join("site.json");
    fs::write(&ini, "[DEFAULT]\nname = ini-service\n\n[limits]\nmax_connections = 75\n")
        .expect("write ini");
    fs::write(&json_file, r#"{ "tags": ["blue", "green"] }"#).expect("write json");

    let config = ConfigLoader::<ServiceConfig>::new()
        .env_prefix(None)
        .file(&ini)
        .file(&json_file)
        .load()
        .expect("load");

    assert_eq!(config.name, "ini-service");
    assert_eq!(config.limits.max_connections, 75);
    assert_eq!(config.tags, ["blue", "green"]);
    assert_eq!(config.source_of("limits.max_connections"), Some(&ConfigSource::file(&ini)));
    assert_eq!(config.source_of("tags"), Some(&ConfigSource::file(&json_file)));
}

#[test]
fn missing_required_file_fails() {
    let dir = TempDir::new().expect("temp dir");
    let err = ConfigLoader::<ServiceConfig>::new()
        .env_prefix(None)
        .file(dir.path().join("absent.toml"))
        .load()
        .unwrap_err();

    assert!(matches!(err, ConfigError::Load { .. }));
    assert_eq!(err.code(), "CONFIG_LOAD");
}

#[test]
fn missing_optional_file_is_skipped() {
    let dir = TempDir::new().expect("temp dir");
    let config = ConfigLoader::<ServiceConfig>::new()
        .env_prefix(None)
        .optional_file(dir.path().join("absent.toml"))
        .load()
        .expect("load");

    assert_eq!(*config.value(), ServiceConfig::default());
}

#[test]
fn invalid_file_values_name_the_layer() {
    let dir = TempDir::new().expect("temp dir");
    let toml = dir.path().join("bad.toml");
    fs::write(&toml, "port = 0\n").expect("write toml");

    let err = ConfigLoader::<ServiceConfig>::new().env_prefix(None).file(&toml).load().unwrap_err();

    assert_eq!(err.code(), "CONFIG_INVALID");
    assert!(err.to_string().contains("bad.toml"), "{err}");
}

#[test]
fn loader_defaults_become_the_baseline() {
    let mut config = ConfigLoader::<ServiceConfig>::new()
        .env_prefix(None)
        .defaults(json!({ "port": 6000 }))
        .override_with(json!({ "port": 6001 }))
        .load()
        .expect("load");

    config.reset("port").expect("reset");
    assert_eq!(config.port, 6000);
}

#[test]
fn load_config_reads_a_single_file() {
    let dir = TempDir::new().expect("temp dir");
    let toml = dir.path().join("settings.toml");
    fs::write(&toml, "name = \"one-shot\"\n").expect("write toml");

    let config: ServiceConfig = load_config(Some(&toml)).expect("load");
    assert_eq!(config.name, "one-shot");
}
