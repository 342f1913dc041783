//! # Transport
//!
//! HTTP client transport settings ([`TransportConfig`]) and their registration in a
//! [`ConfigRegistry`](bedrock_config::ConfigRegistry).
//!
//! ## Example
//!
//! ```rust
//! use bedrock_config::ConfigRegistry;
//! use bedrock_transport::{TRANSPORT_CONFIG_NAME, TransportConfig, register_transport_config};
//! use serde_json::json;
//!
//! let registry = ConfigRegistry::new();
//! register_transport_config(&registry)?;
//!
//! let config: TransportConfig = registry
//!     .load(TRANSPORT_CONFIG_NAME, Some(json!({ "http": { "retry": { "max_retries": 5 } } })))?;
//! assert_eq!(config.http.retry.max_retries, 5);
//! assert!(config.http.verify_tls);
//! # Ok::<(), bedrock_config::ConfigError>(())
//! ```

mod config;
mod registration;

pub use crate::config::{HttpClientConfig, PoolConfig, RetryConfig, TimeoutConfig, TransportConfig};
pub use crate::registration::{
    TRANSPORT_CONFIG_NAME, default_values, register_default, register_transport_config,
};
