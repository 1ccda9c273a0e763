//! Uploader module
//!
//! Orchestrates one upload attempt end to end: the no-file check, the
//! single-slot in-flight guard, key derivation, the streamed object write
//! with progress ticks, and the linked metadata append. The attempt moves
//! through Idle → Uploading → {Succeeded, Failed}; Succeeded is reached only
//! once both the object write and the record append completed.
//!
//! When the record append fails after a successful object write, the
//! uploader issues a compensating delete for the object so the store and the
//! record collection cannot silently diverge.

use crate::config::Config;
use crate::metrics;
use crate::notify::Notifier;
use crate::records::http::DocumentStoreClient;
use crate::records::{DocumentRecord, DocumentStore, RecordError};
use crate::session::SharedSession;
use crate::store::http::ObjectStoreClient;
use crate::store::{ObjectStore, Progress, ProgressSink, StoreError};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;

/// Error surfaced to the caller when "no file selected" fires
pub const NO_FILE_SELECTED: &str = "No file selected. Please choose a file.";

/// Uploader errors
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Upload failed: {0}")]
    Transport(#[from] StoreError),

    #[error("Metadata record failed: {0}")]
    RecordWrite(#[from] RecordError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Upload orchestrator
///
/// Holds the object store, the document store, the destination key prefix,
/// and the record collection name. A single-slot guard rejects a second
/// trigger while an attempt is in flight.
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    records: Arc<dyn DocumentStore>,
    key_prefix: String,
    collection: String,
    in_flight: Mutex<()>,
}

impl Uploader {
    /// Create an uploader over explicit store implementations
    pub fn new(
        store: Arc<dyn ObjectStore>,
        records: Arc<dyn DocumentStore>,
        key_prefix: &str,
        collection: &str,
    ) -> Self {
        Self {
            store,
            records,
            key_prefix: key_prefix.trim_matches('/').to_string(),
            collection: collection.to_string(),
            in_flight: Mutex::new(()),
        }
    }

    /// Create an uploader with HTTP clients built from the configuration
    pub fn from_config(config: &Config) -> Result<Self, UploadError> {
        let store =
            ObjectStoreClient::new(config.storage.client_config()).map_err(|e| UploadError::Config(e.to_string()))?;
        let records = DocumentStoreClient::new(config.records.client_config())
            .map_err(|e| UploadError::Config(e.to_string()))?;
        Ok(Self::new(
            Arc::new(store),
            Arc::new(records),
            &config.storage.key_prefix,
            &config.records.collection,
        ))
    }

    /// Destination key for a file name, under the configured prefix.
    ///
    /// Deterministic and collision-blind: a same-named file lands on the same
    /// key, and whether that overwrites or errors is left to the store.
    pub fn derive_key(&self, name: &str) -> String {
        if self.key_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.key_prefix, name)
        }
    }

    /// Run one upload attempt for the session's accepted file.
    ///
    /// Fails fast, without network activity, when no file is selected or
    /// another attempt holds the in-flight slot. Otherwise streams the
    /// payload, folds progress ticks into the session, appends the metadata
    /// record, and reports the terminal outcome through the notifier.
    #[tracing::instrument(
        name = "uploader.upload",
        skip_all,
        fields(
            upload.attempt = %uuid::Uuid::new_v4(),
            file.name = tracing::field::Empty,
            store.key = tracing::field::Empty
        ),
        err
    )]
    pub async fn upload(
        &self,
        session: &SharedSession,
        notifier: Arc<dyn Notifier>,
    ) -> Result<DocumentRecord, UploadError> {
        let selected = session.lock().selected();
        let Some(file) = selected else {
            session.lock().set_error(NO_FILE_SELECTED);
            notifier.on_error(NO_FILE_SELECTED);
            return Err(UploadError::NoFileSelected);
        };

        let Ok(_slot) = self.in_flight.try_lock() else {
            let reason = UploadError::UploadInProgress.to_string();
            notifier.on_error(&reason);
            return Err(UploadError::UploadInProgress);
        };

        let span = tracing::Span::current();
        span.record("file.name", file.name.as_str());
        let key = self.derive_key(&file.name);
        span.record("store.key", key.as_str());

        session.lock().begin_attempt();
        let start = Instant::now();

        let sink: ProgressSink = {
            let session = session.clone();
            let notifier = notifier.clone();
            Arc::new(move |progress: Progress| {
                let pct = session.lock().record_progress(progress.percent());
                notifier.on_progress(pct);
            })
        };

        let stored = match self
            .store
            .put(&key, file.payload.clone(), &file.content_type, sink)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                metrics::record_upload_failure();
                let reason = e.to_string();
                session.lock().finish_failure(&reason);
                notifier.on_error(&reason);
                return Err(UploadError::Transport(e));
            }
        };

        let record = DocumentRecord::new(&stored.url, &file.name);
        if let Err(e) = self.records.append(&self.collection, &record).await {
            metrics::record_record_write(false);
            metrics::record_upload_failure();
            self.compensate(&key).await;

            let reason = format!("metadata record failed: {}", e);
            session.lock().finish_failure(&reason);
            notifier.on_error(&reason);
            return Err(UploadError::RecordWrite(e));
        }

        metrics::record_record_write(true);
        metrics::record_upload_success(stored.bytes_written);
        metrics::record_upload_duration(start.elapsed().as_secs_f64());

        session.lock().finish_success();
        notifier.on_success(&record);
        Ok(record)
    }

    /// Delete the object written by this attempt after its record append
    /// failed. A failed compensation leaves an orphaned object; it is logged
    /// and counted, nothing more can be done from here.
    async fn compensate(&self, key: &str) {
        match self.store.delete(key).await {
            Ok(()) => {
                metrics::record_compensating_delete();
                tracing::info!(key = %key, "compensating delete after failed record append");
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "compensating delete failed, object is orphaned"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MockDocumentStore;
    use crate::session::{SelectedFile, UploadSession};
    use crate::store::{MockObjectStore, StoredObject};
    use crate::validate::Validator;
    use bytes::Bytes;

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn on_progress(&self, _percent: u8) {}
        fn on_success(&self, _record: &DocumentRecord) {}
        fn on_error(&self, _reason: &str) {}
    }

    fn selected_session(name: &str, content_type: &str) -> SharedSession {
        let session = UploadSession::shared();
        let file = SelectedFile::new(name, content_type, Bytes::from_static(b"payload"));
        UploadSession::select(&session, file, &Validator::default());
        session
    }

    #[tokio::test]
    async fn test_no_selected_file_makes_no_store_call() {
        let mut store = MockObjectStore::new();
        store.expect_put().times(0);
        let mut records = MockDocumentStore::new();
        records.expect_append().times(0);

        let uploader = Uploader::new(Arc::new(store), Arc::new(records), "documents", "documents");
        let session = UploadSession::shared();

        let result = uploader.upload(&session, Arc::new(SilentNotifier)).await;
        assert!(matches!(result, Err(UploadError::NoFileSelected)));
        assert_eq!(session.lock().error(), Some(NO_FILE_SELECTED));
    }

    #[tokio::test]
    async fn test_success_appends_exactly_one_record() {
        let mut store = MockObjectStore::new();
        store.expect_put().times(1).returning(|_, payload, _, _| {
            Ok(StoredObject {
                url: "https://store/doc.pdf".to_string(),
                etag: None,
                bytes_written: payload.len() as u64,
            })
        });

        let mut records = MockDocumentStore::new();
        records
            .expect_append()
            .withf(|collection, record| {
                collection == "documents"
                    && record.url == "https://store/doc.pdf"
                    && record.name == "doc.pdf"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let uploader = Uploader::new(Arc::new(store), Arc::new(records), "documents", "documents");
        let session = selected_session("doc.pdf", "application/pdf");

        let record = uploader
            .upload(&session, Arc::new(SilentNotifier))
            .await
            .unwrap();
        assert_eq!(record.url, "https://store/doc.pdf");
        assert_eq!(record.name, "doc.pdf");
    }

    #[tokio::test]
    async fn test_store_failure_appends_no_record() {
        let mut store = MockObjectStore::new();
        store
            .expect_put()
            .times(1)
            .returning(|_, _, _, _| Err(StoreError::Rejected("connection reset".into())));
        let mut records = MockDocumentStore::new();
        records.expect_append().times(0);

        let uploader = Uploader::new(Arc::new(store), Arc::new(records), "documents", "documents");
        let session = selected_session("doc.pdf", "application/pdf");

        let result = uploader.upload(&session, Arc::new(SilentNotifier)).await;
        assert!(matches!(result, Err(UploadError::Transport(_))));
        assert!(session.lock().error().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_record_failure_triggers_compensating_delete() {
        let mut store = MockObjectStore::new();
        store.expect_put().times(1).returning(|_, payload, _, _| {
            Ok(StoredObject {
                url: "https://store/doc.pdf".to_string(),
                etag: None,
                bytes_written: payload.len() as u64,
            })
        });
        store
            .expect_delete()
            .withf(|key| key == "documents/doc.pdf")
            .times(1)
            .returning(|_| Ok(()));

        let mut records = MockDocumentStore::new();
        records
            .expect_append()
            .times(1)
            .returning(|_, _| Err(RecordError::Rejected("quota exceeded".into())));

        let uploader = Uploader::new(Arc::new(store), Arc::new(records), "documents", "documents");
        let session = selected_session("doc.pdf", "application/pdf");

        let result = uploader.upload(&session, Arc::new(SilentNotifier)).await;
        assert!(matches!(result, Err(UploadError::RecordWrite(_))));
    }

    #[test]
    fn test_derive_key_joins_prefix_and_name() {
        let uploader = Uploader::new(
            Arc::new(MockObjectStore::new()),
            Arc::new(MockDocumentStore::new()),
            "documents/",
            "documents",
        );
        assert_eq!(uploader.derive_key("doc.pdf"), "documents/doc.pdf");

        let bare = Uploader::new(
            Arc::new(MockObjectStore::new()),
            Arc::new(MockDocumentStore::new()),
            "",
            "documents",
        );
        assert_eq!(bare.derive_key("doc.pdf"), "doc.pdf");
    }
}
