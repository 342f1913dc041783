use bedrock_logger::{Logger, LoggerError, LoggingConfig};

#[test]
fn init_twice_returns_subscriber_error() {
    let config = LoggingConfig { name: "integration-init-twice".into(), ..LoggingConfig::default() };
    let _logger = Logger::init(&config).expect("first init should succeed");

    let err = Logger::init(&config).expect_err("second init should fail");

    assert!(
        matches!(err, LoggerError::Subscriber { .. }),
        "expected subscriber error for second init"
    );
    assert_eq!(err.code(), "LOGGER_SUBSCRIBER");
}

#[test]
fn invalid_configuration_is_rejected_before_installing() {
    let config = LoggingConfig { level: "chatty".into(), ..LoggingConfig::default() };
    let err = Logger::init(&config).unwrap_err();

    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
}
