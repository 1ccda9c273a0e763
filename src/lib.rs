//! Docdrop Library
//!
//! Validated document upload pipeline with progress reporting and metadata
//! records.
//!
//! # Features
//!
//! - **Validation First**: Declared media type and size checked before any
//!   network activity
//! - **Progress Reporting**: Per-chunk progress ticks as a percentage
//! - **Linked Metadata**: A `{url, name}` record is appended to the document
//!   store only after the object write succeeds, with a compensating delete
//!   if the record append fails
//! - **Single-Slot Guard**: A second trigger while an upload is in flight is
//!   rejected instead of racing
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use docdrop::config::Config;
//! use docdrop::notify::LogNotifier;
//! use docdrop::session::{SelectedFile, UploadSession};
//! use docdrop::uploader::Uploader;
//! use docdrop::validate::Validator;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load("config.yaml")?;
//! let validator = Validator::from_config(&config.validation);
//! let uploader = Uploader::from_config(&config)?;
//!
//! let session = UploadSession::shared();
//! let file = SelectedFile::new(
//!     "report.pdf",
//!     "application/pdf",
//!     bytes::Bytes::from_static(b"%PDF-"),
//! );
//! UploadSession::select(&session, file, &validator);
//!
//! let record = uploader.upload(&session, Arc::new(LogNotifier)).await?;
//! println!("Recorded {} at {}", record.name, record.url);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod metrics;
pub mod notify;
pub mod records;
pub mod session;
pub mod store;
pub mod uploader;
pub mod validate;

// Re-export commonly used types
pub use config::Config;
pub use uploader::Uploader;
pub use validate::Validator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
