use bedrock_config::{ConfigSource, Tracked};
use bedrock_logger::{LogRotation, Logger, LoggingConfig};
use serde_json::json;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn file_logging_creates_log_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let mut config = Tracked::<LoggingConfig>::new()?;
    config.merge(
        json!({
            "name": "integration-file-logging",
            "console": false,
            "directory": log_dir,
            "rotation": "never",
        }),
        ConfigSource::Override,
    )?;
    assert_eq!(config.rotation, LogRotation::Never);

    let logger = Logger::init(&config)?;
    assert!(logger.guard().is_some());

    tracing::info!("hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    assert!(contents.contains("hello from integration test"), "{contents}");

    Ok(())
}
