//! Document store HTTP client
//!
//! Posts records as JSON to a project-scoped collection endpoint, carrying an
//! API key header. The endpoint, project identifier, and key come from the
//! hosting environment through configuration; their absence or invalidity
//! surfaces as a store error at request time, not a process fault.

use super::{DocumentRecord, DocumentStore, RecordError};
use async_trait::async_trait;

/// Document store client configuration
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    /// Base endpoint, e.g. `https://records.example.com`
    pub endpoint: String,
    pub project_id: String,
    pub api_key: Option<String>,
}

/// Document store client
pub struct DocumentStoreClient {
    config: DocumentStoreConfig,
    http_client: reqwest::Client,
}

impl DocumentStoreClient {
    /// Create a new client
    pub fn new(config: DocumentStoreConfig) -> Result<Self, RecordError> {
        if config.endpoint.is_empty() {
            return Err(RecordError::ConfigError("endpoint must not be empty".into()));
        }
        if config.project_id.is_empty() {
            return Err(RecordError::ConfigError(
                "project_id must not be empty".into(),
            ));
        }
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| RecordError::ConfigError(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// URL records for `collection` are appended to
    pub fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/collections/{}/records",
            self.config.endpoint.trim_end_matches('/'),
            self.config.project_id,
            collection
        )
    }
}

#[async_trait]
impl DocumentStore for DocumentStoreClient {
    #[tracing::instrument(
        name = "records.append",
        skip(self, record),
        fields(
            records.collection = %collection,
            records.name = %record.name,
            http.method = "POST",
            http.status_code = tracing::field::Empty
        ),
        err
    )]
    async fn append(&self, collection: &str, record: &DocumentRecord) -> Result<(), RecordError> {
        let url = self.collection_url(collection);
        let mut request = self.http_client.post(&url).json(record);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RecordError::RequestError(e.to_string()))?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                format!("HTTP {}: {}", status.as_u16(), body.trim())
            };
            return Err(RecordError::Rejected(reason));
        }

        tracing::info!(
            collection = %collection,
            name = %record.name,
            "record appended"
        );
        Ok(())
    }
}
