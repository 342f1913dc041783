use crate::error::FoundationError;
use serde::Serialize;
use std::collections::BTreeMap;

/// A serializable snapshot of a [`FoundationError`], suitable for structured logs and API bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
    pub details: BTreeMap<&'static str, String>,
}

impl FoundationError {
    /// Builds the serializable [`ErrorReport`] for this error.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.message().into_owned(),
            retryable: self.is_retryable(),
            details: self.details(),
        }
    }
}

impl From<&FoundationError> for ErrorReport {
    fn from(error: &FoundationError) -> Self {
        error.report()
    }
}
