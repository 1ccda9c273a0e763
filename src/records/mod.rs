//! Document store boundary
//!
//! Append-only writes of `{url, name}` metadata records into a named
//! collection. The uploader appends exactly one record per successful upload;
//! there is no update or delete surface and no idempotency key, so a
//! re-triggered upload can legally produce a duplicate record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;
pub mod memory;

/// Document store errors
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Store rejected the record: {0}")]
    Rejected(String),
}

/// Metadata record written after a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Public retrieval URL of the uploaded object
    pub url: String,
    /// Original file name
    pub name: String,
    /// Append time
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(url: &str, name: &str) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only record writer
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a record to the named collection
    async fn append(&self, collection: &str, record: &DocumentRecord) -> Result<(), RecordError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_url_and_name() {
        let record = DocumentRecord::new("https://store/doc.pdf", "doc.pdf");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["url"], "https://store/doc.pdf");
        assert_eq!(json["name"], "doc.pdf");
        assert!(json["created_at"].is_string());
    }
}
