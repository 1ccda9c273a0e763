//! Object store boundary
//!
//! A write-stream operation taking (destination key, byte payload) and
//! yielding progress notifications plus a terminal success carrying the
//! object's public retrieval URL, or a failure carrying the underlying
//! reason. `delete` exists for the uploader's compensating step after a
//! failed metadata append.
//!
//! Two implementations live here: an HTTP client for an S3-compatible
//! endpoint ([`http::ObjectStoreClient`]) and an in-memory store for tests
//! and local runs ([`memory::MemoryStore`]).

use bytes::Bytes;
use thiserror::Error;

pub mod http;
pub mod memory;
mod progress;

pub use progress::{Progress, ProgressBody, ProgressSink};

/// Object store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Store rejected the write: {0}")]
    Rejected(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),
}

/// Terminal result of a successful object write
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Public retrieval URL for the object
    pub url: String,
    /// Entity tag reported by the store, if any
    pub etag: Option<String>,
    pub bytes_written: u64,
}

/// Object store trait
///
/// Progress is delivered through the sink an arbitrary number of times with
/// non-decreasing byte counts, up to the payload total.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write a payload under `key`, reporting progress through `sink`
    async fn put(
        &self,
        key: &str,
        payload: Bytes,
        content_type: &str,
        sink: ProgressSink,
    ) -> Result<StoredObject, StoreError>;

    /// Remove the object at `key`. Used as the compensating action when the
    /// metadata append after a successful write fails.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
