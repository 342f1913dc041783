//! # CLI
//!
//! Classifies parameters into positional arguments, options and flags, builds a `clap`
//! command from the result and turns parsed input back into a dictionary.
//!
//! ## Example
//!
//! ```rust
//! use bedrock_cli::{ClassifyPolicy, ParamKind, ParamSpec, ParamType, build_command, classify, extract};
//! use serde_json::json;
//!
//! let params = classify(
//!     &[
//!         ParamSpec::new("input", ParamType::Path),
//!         ParamSpec::new("verbose", ParamType::Bool).with_default(false),
//!         ParamSpec::new("http.retry.max_retries", ParamType::Integer).with_default(3),
//!     ],
//!     ClassifyPolicy::default(),
//! )?;
//! assert_eq!(params[0].kind, ParamKind::Argument { required: true });
//!
//! let matches = build_command("demo", &params)
//!     .try_get_matches_from(["demo", "data.ini", "--http.retry.max-retries", "5"])
//!     .unwrap();
//! let values = extract(&matches, &params)?;
//! assert_eq!(values["http"]["retry"]["max_retries"], json!(5));
//! assert!(!values.contains_key("verbose"));
//! # Ok::<(), bedrock_errors::FoundationError>(())
//! ```

mod classify;
mod command;
mod param;

pub use crate::classify::classify;
pub use crate::command::{build_command, extract};
pub use crate::param::{
    ClassifiedParam, ClassifyPolicy, ParamHint, ParamKind, ParamSpec, ParamType,
};
