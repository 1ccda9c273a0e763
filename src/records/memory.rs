//! In-memory document store
//!
//! Collections live in a map of append-only vectors. An append failure can be
//! injected to exercise the uploader's compensating path.

use super::{DocumentRecord, DocumentStore, RecordError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory document store
#[derive(Default)]
pub struct MemoryRecords {
    collections: Mutex<HashMap<String, Vec<DocumentRecord>>>,
    fail_append: Option<String>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose appends always fail
    pub fn with_append_failure(reason: &str) -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            fail_append: Some(reason.to_string()),
        }
    }

    /// Records appended to `collection`, in order
    pub fn records(&self, collection: &str) -> Vec<DocumentRecord> {
        self.collections
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryRecords {
    async fn append(&self, collection: &str, record: &DocumentRecord) -> Result<(), RecordError> {
        if let Some(reason) = &self.fail_append {
            return Err(RecordError::Rejected(reason.clone()));
        }
        self.collections
            .lock()
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_appends_preserve_order() {
        let store = MemoryRecords::new();
        for name in ["a.pdf", "b.txt"] {
            let record = DocumentRecord::new(&format!("https://store/{}", name), name);
            store.append("documents", &record).await.unwrap();
        }

        let records = store.records("documents");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "a.pdf");
        assert_eq!(records[1].name, "b.txt");
    }

    #[tokio::test]
    async fn test_injected_failure_appends_nothing() {
        let store = MemoryRecords::with_append_failure("quota exceeded");
        let record = DocumentRecord::new("https://store/a.pdf", "a.pdf");

        assert!(store.append("documents", &record).await.is_err());
        assert!(store.records("documents").is_empty());
    }
}
