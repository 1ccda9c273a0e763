//! Validator module
//!
//! Checks a selected file's declared media type and byte size against a fixed
//! allow-list and ceiling before any network activity happens.
//!
//! The declared type is trusted as given by the caller; there is no content
//! sniffing. Validation is a pure function of the file descriptor.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use docdrop::session::SelectedFile;
//! use docdrop::validate::{Validator, Verdict};
//!
//! let validator = Validator::default();
//! let file = SelectedFile::new("notes.txt", "text/plain", Bytes::from_static(b"hello"));
//!
//! assert!(matches!(validator.check(&file), Verdict::Accepted));
//! ```

use crate::config::ValidationConfig;
use crate::session::SelectedFile;
use std::fmt;

/// Media types accepted by default
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &["application/pdf", "text/plain"];

/// Default size ceiling: 5 MiB, boundary inclusive
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Why a file was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Declared media type is not in the allow-list
    UnsupportedType(String),
    /// Byte size exceeds the configured ceiling
    TooLarge { size: u64, limit: u64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnsupportedType(t) => {
                write!(f, "unsupported file type '{}': expected PDF or plain text", t)
            }
            RejectReason::TooLarge { size, limit } => {
                write!(f, "file is {} bytes, limit is {} bytes", size, limit)
            }
        }
    }
}

/// Validation outcome. Derived from the file descriptor, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    /// Whether the file passed validation
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// File validator with a configurable allow-list and size ceiling
#[derive(Debug, Clone)]
pub struct Validator {
    allowed_types: Vec<String>,
    max_size_bytes: u64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl Validator {
    /// Create a validator with explicit limits
    pub fn new(allowed_types: Vec<String>, max_size_bytes: u64) -> Self {
        Self {
            allowed_types,
            max_size_bytes,
        }
    }

    /// Create a validator from the loaded configuration section
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            allowed_types: config.allowed_types.clone(),
            max_size_bytes: config.max_size_bytes,
        }
    }

    /// Size ceiling in bytes (inclusive)
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Check a file descriptor against the allow-list and ceiling.
    ///
    /// Type is checked before size: a file with a disallowed type is rejected
    /// for its type regardless of how large it is.
    pub fn check(&self, file: &SelectedFile) -> Verdict {
        if !self.allowed_types.iter().any(|t| t == &file.content_type) {
            return Verdict::Rejected(RejectReason::UnsupportedType(file.content_type.clone()));
        }
        if file.size > self.max_size_bytes {
            return Verdict::Rejected(RejectReason::TooLarge {
                size: file.size,
                limit: self.max_size_bytes,
            });
        }
        Verdict::Accepted
    }
}
