//! # Config
//!
//! Source-tracked configuration models.
//!
//! - [`Tracked`] wraps any [`ConfigModel`] and remembers which [`ConfigSource`] set each field,
//!   the value it held before it was first changed, and how it differs from another instance.
//! - [`ConfigLoader`] layers defaults, files, environment variables and runtime overrides,
//!   attributing every field to the last layer that supplied it.
//! - [`ConfigRegistry`] maps names to registered models with their defaults.
//!
//! Fields are addressed by dotted paths of the serialized model (`http.timeout.connect`).
//!
//! ## Example
//!
//! ```rust
//! use bedrock_config::{ConfigModel, ConfigSource, Tracked};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Default for Server {
//!     fn default() -> Self {
//!         Self { host: "localhost".into(), port: 8080 }
//!     }
//! }
//!
//! impl ConfigModel for Server {}
//!
//! let mut server = Tracked::<Server>::new()?;
//! server.merge(json!({ "port": 9090 }), ConfigSource::Environment)?;
//!
//! assert_eq!(server.port, 9090);
//! assert_eq!(server.source_of("port"), Some(&ConfigSource::Environment));
//! assert_eq!(server.source_of("host"), Some(&ConfigSource::Default));
//! assert_eq!(server.original_value("port").and_then(|o| o.value.clone()), Some(json!(8080)));
//! # Ok::<(), bedrock_config::ConfigError>(())
//! ```

mod diff;
mod error;
mod loader;
mod model;
mod path;
mod registry;
mod source;
mod tracked;

pub use crate::diff::{ConfigDiff, FieldChange};
pub use crate::error::{ConfigError, ConfigErrorExt};
pub use crate::loader::{ConfigLoader, DEFAULT_ENV_PREFIX, DEFAULT_ENV_SEPARATOR, load_config};
pub use crate::model::ConfigModel;
pub use crate::registry::{ConfigRegistry, Loader, serde_loader};
pub use crate::source::ConfigSource;
pub use crate::tracked::{FieldInfo, OriginalValue, Tracked};
