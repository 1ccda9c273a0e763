//! In-memory object store
//!
//! Backend for tests and local runs. Objects live in a map, public URLs are
//! synthesized under a `memory://` base, and progress ticks are emitted at
//! the same chunk granularity as the HTTP client. A put failure can be
//! injected to exercise the uploader's failure paths.

use super::progress::{Progress, ProgressSink, PROGRESS_CHUNK_BYTES};
use super::{ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory object store
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Bytes>>,
    base_url: String,
    fail_put: Option<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            base_url: "memory://documents".to_string(),
            fail_put: None,
        }
    }

    /// Store whose puts fail after reporting partial progress
    pub fn with_put_failure(reason: &str) -> Self {
        Self {
            fail_put: Some(reason.to_string()),
            ..Self::new()
        }
    }

    /// Payload stored under `key`, if present
    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().get(key).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        payload: Bytes,
        _content_type: &str,
        sink: ProgressSink,
    ) -> Result<StoredObject, StoreError> {
        let total = payload.len() as u64;
        sink(Progress {
            transferred: 0,
            total,
        });

        if let Some(reason) = &self.fail_put {
            // Simulated mid-transfer failure: some bytes reported, then error
            sink(Progress {
                transferred: total / 2,
                total,
            });
            return Err(StoreError::Rejected(reason.clone()));
        }

        let mut transferred = 0usize;
        while transferred < payload.len() {
            transferred = (transferred + PROGRESS_CHUNK_BYTES).min(payload.len());
            sink(Progress {
                transferred: transferred as u64,
                total,
            });
        }
        if payload.is_empty() {
            sink(Progress {
                transferred: 0,
                total: 0,
            });
        }

        let bytes_written = payload.len() as u64;
        // Same-named keys overwrite silently, matching remote store semantics
        self.objects.lock().insert(key.to_string(), payload);

        Ok(StoredObject {
            url: format!("{}/{}", self.base_url, key),
            etag: None,
            bytes_written,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.objects.lock().remove(key);
        Ok(())
    }
}
