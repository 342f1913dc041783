//! # INI
//!
//! Reading and writing INI text as two-level `section -> key -> value` documents.
//!
//! - [`loads`] / [`dumps`] convert between text and [`IniDocument`]. Parsed documents are cached
//!   by the SHA-256 of their text, so repeated loads of the same content are free.
//! - [`from_value`] / [`to_value`] convert between documents and nested `serde_json` dictionaries.
//! - [`load`] / [`dump`] are the file-based counterparts of [`loads`] / [`dumps`].
//!
//! ## Example
//!
//! ```rust
//! use bedrock_ini::{dumps, loads, to_value};
//! use serde_json::json;
//!
//! let document = loads("[DEFAULT]\nretries = 3\n\n[http]\nverify = true\n")?;
//! assert_eq!(document.get("http", "retries"), Some("3"));
//! assert_eq!(to_value(&document), json!({ "retries": 3, "http": { "verify": true } }));
//!
//! let text = dumps(&document)?;
//! assert!(std::sync::Arc::ptr_eq(&loads(&text)?, &document));
//! # Ok::<(), bedrock_ini::IniError>(())
//! ```

mod cache;
mod codec;
mod document;
mod error;
mod value;

pub use crate::cache::{DEFAULT_CACHE_CAPACITY, IniCache, clear_cache};
pub use crate::codec::{dump, dumps, load, loads, parse};
pub use crate::document::{DEFAULT_SECTION, IniDocument, Section};
pub use crate::error::{IniError, IniErrorExt};
pub use crate::value::{from_value, to_value};
