use bedrock_errors::{FoundationError, FoundationErrorExt};
use std::time::Duration;

#[test]
fn every_kind_has_a_fixed_code() {
    let cases = [
        (FoundationError::runtime("sync", "boom"), "RUNTIME_ERROR"),
        (FoundationError::state("closed"), "STATE_ERROR"),
        (FoundationError::concurrency("doc", Some(1), Some(2)), "CONCURRENCY_ERROR"),
        (FoundationError::rate_limited(10, Duration::from_secs(1), None), "RATE_LIMIT_EXCEEDED"),
        (FoundationError::key_generation("rsa", "size"), "KEY_GENERATION_ERROR"),
        (FoundationError::certificate("untrusted"), "CERTIFICATE_ERROR"),
        (FoundationError::validation("port", "out of range"), "VALIDATION_ERROR"),
        (FoundationError::from("unexpected"), "INTERNAL_ERROR"),
    ];

    for (err, code) in cases {
        assert_eq!(err.code(), code, "wrong code for {err}");
    }
}

#[test]
fn runtime_retry_flag_drives_retryability() {
    let err = FoundationError::runtime("fetch", "timed out");
    assert!(!err.is_retryable());

    let err = err.retryable(true);
    assert!(err.is_retryable());
    assert_eq!(err.details()["retryable"], "true");
    assert_eq!(err.details()["operation"], "fetch");
}

#[test]
fn retryable_flag_is_ignored_outside_runtime() {
    let err = FoundationError::validation("name", "empty").retryable(true);
    assert!(!err.is_retryable());
}

#[test]
fn state_transition_carries_both_states() {
    let err = FoundationError::state_transition("stopped", "draining");
    let details = err.details();

    assert_eq!(details["current_state"], "stopped");
    assert_eq!(details["target_state"], "draining");
    assert_eq!(
        err.to_string(),
        "State error: Transition from 'stopped' to 'draining' is not allowed"
    );
}

#[test]
fn concurrency_display_lists_versions() {
    let err = FoundationError::concurrency("invoice:7", Some(3), Some(5));
    assert_eq!(
        err.to_string(),
        "Concurrency conflict on 'invoice:7': expected version 3, found 5"
    );
    assert!(err.is_retryable());

    let partial = FoundationError::concurrency("invoice:7", None, Some(5));
    assert!(!partial.details().contains_key("expected_version"));
}

#[test]
fn rate_limit_details_use_seconds() {
    let err = FoundationError::rate_limited(
        100,
        Duration::from_secs(60),
        Some(Duration::from_millis(1500)),
    );
    let details = err.details();

    assert_eq!(details["limit"], "100");
    assert_eq!(details["window_seconds"], "60");
    assert_eq!(details["retry_after_seconds"], "1.5");
    assert_eq!(err.to_string(), "Rate limit of 100 per 60s exceeded, retry after 1.500s");
    assert!(err.is_retryable());
}

#[test]
fn context_is_appended_and_reported() {
    let result: Result<(), FoundationError> =
        Err(FoundationError::certificate_for("CN=api", "signature mismatch"));
    let err = result.context("TLS handshake").unwrap_err();

    assert_eq!(err.to_string(), "Certificate error (TLS handshake): signature mismatch");
    assert_eq!(err.details()["context"], "TLS handshake");
    assert_eq!(err.details()["subject"], "CN=api");
}

#[test]
fn report_serializes_to_json() {
    let err = FoundationError::validation("http.timeout.connect", "must be positive");
    let report = err.report();

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "must be positive");
    assert_eq!(json["retryable"], false);
    assert_eq!(json["details"]["field"], "http.timeout.connect");
}
