//! S3-compatible object store client
//!
//! Speaks path-style PUT/DELETE against an S3-compatible HTTP endpoint.
//! Progress is reported through the caller's sink as the request body is
//! consumed by the transport. Error bodies in the store's XML format are
//! decoded into readable failure reasons.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use docdrop::store::http::{ObjectStoreClient, ObjectStoreConfig};
//! use docdrop::store::ObjectStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ObjectStoreConfig {
//!     bucket: "documents".to_string(),
//!     region: "us-east-1".to_string(),
//!     endpoint: None,
//!     token: None,
//!     public_base_url: None,
//! };
//! let client = ObjectStoreClient::new(config)?;
//!
//! let sink = Arc::new(|p: docdrop::store::Progress| {
//!     println!("{}%", p.percent());
//! });
//! let stored = client
//!     .put("documents/hello.txt", Bytes::from("Hello"), "text/plain", sink)
//!     .await?;
//! println!("stored at {}", stored.url);
//! # Ok(())
//! # }
//! ```

use super::progress::{Progress, ProgressBody, ProgressSink};
use super::{ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

/// Characters that survive key encoding: unreserved plus the path separator
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Object store client configuration
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint; defaults to the regional S3 endpoint
    pub endpoint: Option<String>,
    /// Optional bearer token sent with every request
    pub token: Option<String>,
    /// Base URL for public retrieval, when it differs from the write endpoint
    pub public_base_url: Option<String>,
}

/// Streamed upload error body, S3 XML format
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

/// S3-compatible object store client
pub struct ObjectStoreClient {
    config: ObjectStoreConfig,
    http_client: reqwest::Client,
}

impl ObjectStoreClient {
    /// Create a new client
    pub fn new(config: ObjectStoreConfig) -> Result<Self, StoreError> {
        if config.bucket.is_empty() {
            return Err(StoreError::ConfigError("bucket must not be empty".into()));
        }
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| StoreError::ConfigError(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> String {
        self.config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", self.config.region))
    }

    /// URL the object is written to (path-style)
    pub fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint().trim_end_matches('/'),
            self.config.bucket,
            utf8_percent_encode(key, KEY_ENCODE_SET)
        )
    }

    /// Public retrieval URL for the object
    pub fn public_url(&self, key: &str) -> String {
        match &self.config.public_base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                utf8_percent_encode(key, KEY_ENCODE_SET)
            ),
            None => self.object_url(key),
        }
    }

    /// Decode an S3-style XML error body into its message, falling back to
    /// the raw body when it does not parse
    fn error_reason(status: reqwest::StatusCode, body: &str) -> String {
        match quick_xml::de::from_str::<StoreErrorBody>(body) {
            Ok(parsed) => format!("{}: {}", parsed.code, parsed.message),
            Err(_) if body.trim().is_empty() => format!("HTTP {}", status.as_u16()),
            Err(_) => format!("HTTP {}: {}", status.as_u16(), body.trim()),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ObjectStore for ObjectStoreClient {
    #[tracing::instrument(
        name = "store.put_object",
        skip(self, payload, sink),
        fields(
            store.bucket = %self.config.bucket,
            store.key = %key,
            http.method = "PUT",
            upload.bytes = payload.len(),
            http.status_code = tracing::field::Empty
        ),
        err
    )]
    async fn put(
        &self,
        key: &str,
        payload: Bytes,
        content_type: &str,
        sink: ProgressSink,
    ) -> Result<StoredObject, StoreError> {
        let total = payload.len() as u64;
        let url = self.object_url(key);

        // Leading tick so observers see the attempt start at 0%
        sink(Progress {
            transferred: 0,
            total,
        });

        let body = reqwest::Body::wrap_stream(ProgressBody::new(payload, sink));
        let request = self
            .http_client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CONTENT_LENGTH, total)
            .body(body);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::RequestError(e.to_string()))?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(Self::error_reason(status, &body)));
        }

        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        tracing::info!(
            key = %key,
            bytes = total,
            etag = ?etag,
            "object written"
        );

        Ok(StoredObject {
            url: self.public_url(key),
            etag,
            bytes_written: total,
        })
    }

    #[tracing::instrument(
        name = "store.delete_object",
        skip(self),
        fields(
            store.bucket = %self.config.bucket,
            store.key = %key,
            http.method = "DELETE"
        ),
        err
    )]
    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let url = self.object_url(key);
        let response = self
            .authorize(self.http_client.delete(&url))
            .send()
            .await
            .map_err(|e| StoreError::RequestError(e.to_string()))?;

        let status = response.status();
        // A vanished object is an acceptable outcome for a compensating delete
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::DeleteFailed(Self::error_reason(status, &body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> ObjectStoreConfig {
        ObjectStoreConfig {
            bucket: "documents".into(),
            region: "us-west-2".into(),
            endpoint: endpoint.map(|s| s.to_string()),
            token: None,
            public_base_url: None,
        }
    }

    #[test]
    fn test_empty_bucket_is_a_config_error() {
        let mut cfg = config(None);
        cfg.bucket = String::new();
        assert!(ObjectStoreClient::new(cfg).is_err());
    }

    #[test]
    fn test_default_and_custom_endpoint() {
        let client = ObjectStoreClient::new(config(None)).unwrap();
        assert_eq!(client.endpoint(), "https://s3.us-west-2.amazonaws.com");

        let client = ObjectStoreClient::new(config(Some("http://localhost:9000"))).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000");
    }

    #[test]
    fn test_object_url_encodes_key_but_keeps_slashes() {
        let client = ObjectStoreClient::new(config(Some("http://localhost:9000"))).unwrap();
        assert_eq!(
            client.object_url("documents/annual report.pdf"),
            "http://localhost:9000/documents/documents/annual%20report.pdf"
        );
    }

    #[test]
    fn test_public_url_prefers_public_base() {
        let mut cfg = config(Some("http://localhost:9000"));
        cfg.public_base_url = Some("https://cdn.example.com/".into());
        let client = ObjectStoreClient::new(cfg).unwrap();
        assert_eq!(
            client.public_url("documents/doc.pdf"),
            "https://cdn.example.com/documents/doc.pdf"
        );
    }

    #[test]
    fn test_error_reason_decodes_store_xml() {
        let body = "<Error><Code>AccessDenied</Code><Message>Request signature mismatch</Message></Error>";
        let reason = ObjectStoreClient::error_reason(reqwest::StatusCode::FORBIDDEN, body);
        assert_eq!(reason, "AccessDenied: Request signature mismatch");
    }

    #[test]
    fn test_error_reason_falls_back_to_status() {
        let reason = ObjectStoreClient::error_reason(reqwest::StatusCode::BAD_GATEWAY, "");
        assert_eq!(reason, "HTTP 502");
    }
}
