//! # Foundation Errors
//!
//! This module defines the [`FoundationError`] taxonomy shared by every Bedrock crate.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

/// The error taxonomy of the foundation crates.
///
/// Every variant carries a fixed machine-readable code (see [`FoundationError::code`])
/// and structured key/value details (see [`FoundationError::details`]).
#[bedrock_derive::bedrock_error]
pub enum FoundationError {
    /// A failed operation, optionally flagged as safe to retry.
    #[code = "RUNTIME_ERROR"]
    #[error("Runtime error in '{operation}'{}: {message}", format_context(.context))]
    Runtime {
        operation: Cow<'static, str>,
        message: Cow<'static, str>,
        retryable: bool,
        context: Option<Cow<'static, str>>,
    },

    /// An object was in the wrong state, or a state transition is not allowed.
    #[code = "STATE_ERROR"]
    #[error("State error{}: {message}", format_context(.context))]
    State {
        message: Cow<'static, str>,
        current_state: Option<Cow<'static, str>>,
        target_state: Option<Cow<'static, str>>,
        context: Option<Cow<'static, str>>,
    },

    /// Optimistic concurrency conflict on a versioned resource.
    #[code = "CONCURRENCY_ERROR"]
    #[error(
        "Concurrency conflict on '{resource}'{}{}",
        format_versions(.expected_version, .actual_version),
        format_context(.context)
    )]
    Concurrency {
        resource: Cow<'static, str>,
        expected_version: Option<u64>,
        actual_version: Option<u64>,
        context: Option<Cow<'static, str>>,
    },

    /// Too many requests within a window.
    #[code = "RATE_LIMIT_EXCEEDED"]
    #[error(
        "Rate limit of {limit} per {} exceeded{}{}",
        format_duration(.window),
        format_retry_after(.retry_after),
        format_context(.context)
    )]
    RateLimitExceeded {
        limit: u64,
        window: Duration,
        retry_after: Option<Duration>,
        context: Option<Cow<'static, str>>,
    },

    /// A key pair could not be generated, usually because the size or curve is not allowed.
    #[code = "KEY_GENERATION_ERROR"]
    #[error("Key generation failed for {algorithm}{}: {message}", format_context(.context))]
    KeyGeneration {
        algorithm: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// A certificate is malformed or not trusted.
    #[code = "CERTIFICATE_ERROR"]
    #[error("Certificate error{}: {message}", format_context(.context))]
    Certificate {
        subject: Option<Cow<'static, str>>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// Input did not pass validation.
    #[code = "VALIDATION_ERROR"]
    #[error("Validation failed{}{}: {message}", format_field(.field), format_context(.context))]
    Validation {
        field: Option<Cow<'static, str>>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[code = "INTERNAL_ERROR"]
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl FoundationError {
    /// A non-retryable runtime failure of `operation`.
    pub fn runtime(
        operation: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Runtime {
            operation: operation.into(),
            message: message.into(),
            retryable: false,
            context: None,
        }
    }

    /// A state error without transition details.
    pub fn state(message: impl Into<Cow<'static, str>>) -> Self {
        Self::State { message: message.into(), current_state: None, target_state: None, context: None }
    }

    /// A rejected transition from `current` to `target`.
    pub fn state_transition(
        current: impl Into<Cow<'static, str>>,
        target: impl Into<Cow<'static, str>>,
    ) -> Self {
        let current = current.into();
        let target = target.into();
        Self::State {
            message: format!("Transition from '{current}' to '{target}' is not allowed").into(),
            current_state: Some(current),
            target_state: Some(target),
            context: None,
        }
    }

    pub fn concurrency(
        resource: impl Into<Cow<'static, str>>,
        expected_version: Option<u64>,
        actual_version: Option<u64>,
    ) -> Self {
        Self::Concurrency { resource: resource.into(), expected_version, actual_version, context: None }
    }

    pub const fn rate_limited(limit: u64, window: Duration, retry_after: Option<Duration>) -> Self {
        Self::RateLimitExceeded { limit, window, retry_after, context: None }
    }

    pub fn key_generation(
        algorithm: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::KeyGeneration { algorithm: algorithm.into(), message: message.into(), context: None }
    }

    pub fn certificate(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Certificate { subject: None, message: message.into(), context: None }
    }

    /// A certificate error about the certificate identified by `subject`.
    pub fn certificate_for(
        subject: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Certificate { subject: Some(subject.into()), message: message.into(), context: None }
    }

    pub fn validation(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Validation { field: Some(field.into()), message: message.into(), context: None }
    }

    /// Sets the retry flag of a [`FoundationError::Runtime`] error. Other variants are unchanged.
    #[must_use]
    pub fn retryable(mut self, flag: bool) -> Self {
        if let Self::Runtime { retryable, .. } = &mut self {
            *retryable = flag;
        }
        self
    }

    /// Whether the failed operation may succeed if attempted again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Runtime { retryable, .. } => *retryable,
            Self::Concurrency { .. } | Self::RateLimitExceeded { .. } => true,
            _ => false,
        }
    }

    /// The human readable message without the error-kind prefix.
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        match self {
            Self::Runtime { message, .. }
            | Self::State { message, .. }
            | Self::KeyGeneration { message, .. }
            | Self::Certificate { message, .. }
            | Self::Validation { message, .. }
            | Self::Internal { message, .. } => message.clone(),
            Self::Concurrency { resource, .. } => {
                format!("Version conflict on '{resource}'").into()
            },
            Self::RateLimitExceeded { limit, window, .. } => {
                format!("More than {limit} requests per {}", format_duration(window)).into()
            },
        }
    }

    /// Structured key/value context. Keys are stable; absent optional values are omitted.
    #[must_use]
    pub fn details(&self) -> BTreeMap<&'static str, String> {
        let mut details = BTreeMap::new();

        match self {
            Self::Runtime { operation, retryable, .. } => {
                details.insert("operation", operation.to_string());
                details.insert("retryable", retryable.to_string());
            },
            Self::State { current_state, target_state, .. } => {
                insert_opt(&mut details, "current_state", current_state.as_deref());
                insert_opt(&mut details, "target_state", target_state.as_deref());
            },
            Self::Concurrency { resource, expected_version, actual_version, .. } => {
                details.insert("resource", resource.to_string());
                if let Some(version) = expected_version {
                    details.insert("expected_version", version.to_string());
                }
                if let Some(version) = actual_version {
                    details.insert("actual_version", version.to_string());
                }
            },
            Self::RateLimitExceeded { limit, window, retry_after, .. } => {
                details.insert("limit", limit.to_string());
                details.insert("window_seconds", window.as_secs_f64().to_string());
                if let Some(after) = retry_after {
                    details.insert("retry_after_seconds", after.as_secs_f64().to_string());
                }
            },
            Self::KeyGeneration { algorithm, .. } => {
                details.insert("algorithm", algorithm.to_string());
            },
            Self::Certificate { subject, .. } => {
                insert_opt(&mut details, "subject", subject.as_deref());
            },
            Self::Validation { field, .. } => {
                insert_opt(&mut details, "field", field.as_deref());
            },
            Self::Internal { .. } => {},
        }

        insert_opt(&mut details, "context", self.context_str());
        details
    }

    fn context_str(&self) -> Option<&str> {
        match self {
            Self::Runtime { context, .. }
            | Self::State { context, .. }
            | Self::Concurrency { context, .. }
            | Self::RateLimitExceeded { context, .. }
            | Self::KeyGeneration { context, .. }
            | Self::Certificate { context, .. }
            | Self::Validation { context, .. }
            | Self::Internal { context, .. } => context.as_deref(),
        }
    }
}

fn insert_opt(details: &mut BTreeMap<&'static str, String>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        details.insert(key, value.to_owned());
    }
}

fn format_field(field: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    field.as_ref().map_or(Cow::Borrowed(""), |f| Cow::Owned(format!(" for '{f}'")))
}

fn format_versions(expected: &Option<u64>, actual: &Option<u64>) -> Cow<'static, str> {
    match (expected, actual) {
        (Some(e), Some(a)) => format!(": expected version {e}, found {a}").into(),
        (Some(e), None) => format!(": expected version {e}").into(),
        (None, Some(a)) => format!(": found version {a}").into(),
        (None, None) => Cow::Borrowed(""),
    }
}

fn format_retry_after(retry_after: &Option<Duration>) -> Cow<'static, str> {
    retry_after.as_ref().map_or(Cow::Borrowed(""), |d| {
        Cow::Owned(format!(", retry after {}", format_duration(d)))
    })
}

fn format_duration(duration: &Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
