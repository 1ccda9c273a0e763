//! Configuration module for Docdrop
//!
//! Handles loading and parsing of YAML configuration files with support for
//! environment variable expansion and validation. Endpoint and credential
//! parameters come from the hosting environment; this module checks their
//! shape, while their validity is only discovered at request time.
//!
//! # Example
//!
//! ```yaml
//! storage:
//!   bucket: "documents"
//!   region: "us-east-1"
//!   endpoint: "${STORAGE_ENDPOINT:-http://localhost:9000}"
//!   token: "${STORAGE_TOKEN}"
//!   key_prefix: "documents"
//!
//! records:
//!   endpoint: "${RECORDS_ENDPOINT}"
//!   project_id: "my-project"
//!   api_key: "${RECORDS_API_KEY}"
//!   collection: "documents"
//!
//! validation:
//!   allowed_types: ["application/pdf", "text/plain"]
//!   max_size_bytes: 5242880
//! ```

use crate::records::http::DocumentStoreConfig;
use crate::store::http::ObjectStoreConfig;
use crate::validate::{DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_SIZE_BYTES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub records: RecordsConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        ConfigLoader::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.bucket.is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.bucket must not be empty".into(),
            ));
        }
        if let Some(endpoint) = &self.storage.endpoint {
            if !is_valid_http_url(endpoint) {
                return Err(ConfigError::ValidationError(
                    "storage.endpoint must start with http:// or https://".into(),
                ));
            }
        }

        if !is_valid_http_url(&self.records.endpoint) {
            return Err(ConfigError::ValidationError(
                "records.endpoint must start with http:// or https://".into(),
            ));
        }
        if self.records.project_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "records.project_id must not be empty".into(),
            ));
        }
        if self.records.collection.is_empty() {
            return Err(ConfigError::ValidationError(
                "records.collection must not be empty".into(),
            ));
        }

        if self.validation.allowed_types.is_empty() {
            return Err(ConfigError::ValidationError(
                "validation.allowed_types must not be empty".into(),
            ));
        }
        if self.validation.max_size_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "validation.max_size_bytes must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Destination keys are derived as `{key_prefix}/{file name}`
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl StorageConfig {
    /// Client configuration for the object store
    pub fn client_config(&self) -> ObjectStoreConfig {
        ObjectStoreConfig {
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            public_base_url: self.public_base_url.clone(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_key_prefix() -> String {
    "documents".to_string()
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    pub endpoint: String,
    pub project_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl RecordsConfig {
    /// Client configuration for the document store
    pub fn client_config(&self) -> DocumentStoreConfig {
        DocumentStoreConfig {
            endpoint: self.endpoint.clone(),
            project_id: self.project_id.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

fn default_collection() -> String {
    "documents".to_string()
}

/// Validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allowed_types: default_allowed_types(),
            max_size_bytes: default_max_size_bytes(),
        }
    }
}

fn default_allowed_types() -> Vec<String> {
    DEFAULT_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_SIZE_BYTES
}
