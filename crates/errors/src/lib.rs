//! # Errors
//!
//! The shared error taxonomy of the Bedrock crates.
//!
//! [`FoundationError`] models the failure kinds every foundation crate reports: runtime
//! failures, invalid state transitions, optimistic concurrency conflicts, rate limiting,
//! key generation, certificate and validation failures. Each variant has a fixed
//! machine-readable [`code`](FoundationError::code) and structured
//! [`details`](FoundationError::details).
//!
//! ## Example
//!
//! ```rust
//! use bedrock_errors::{FoundationError, FoundationErrorExt};
//!
//! fn reserve(expected: u64, actual: u64) -> Result<(), FoundationError> {
//!     if expected != actual {
//!         return Err(FoundationError::concurrency("ledger", Some(expected), Some(actual)));
//!     }
//!     Ok(())
//! }
//!
//! let err = reserve(3, 4).context("Reserving seat").unwrap_err();
//! assert_eq!(err.code(), "CONCURRENCY_ERROR");
//! assert!(err.is_retryable());
//! assert_eq!(err.details()["actual_version"], "4");
//! ```

mod error;
mod report;

pub use crate::error::{FoundationError, FoundationErrorExt};
pub use crate::report::ErrorReport;

/// Result alias defaulting to [`FoundationError`].
pub type Result<T, E = FoundationError> = std::result::Result<T, E>;
