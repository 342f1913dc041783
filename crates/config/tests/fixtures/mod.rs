#![allow(dead_code)]

use bedrock_config::ConfigModel;
use bedrock_errors::FoundationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub port: u16,
    pub debug: bool,
    pub limits: Limits,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub max_connections: u32,
    pub timeout: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "service".into(),
            port: 8080,
            debug: false,
            limits: Limits { max_connections: 10, timeout: 30.0 },
            tags: Vec::new(),
        }
    }
}

impl ConfigModel for ServiceConfig {
    fn validate(&self) -> Result<(), FoundationError> {
        if self.port == 0 {
            return Err(FoundationError::validation("port", "must be non-zero"));
        }
        if self.limits.max_connections == 0 {
            return Err(FoundationError::validation("limits.max_connections", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherConfig {
    pub enabled: bool,
}

impl ConfigModel for OtherConfig {}
