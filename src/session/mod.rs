//! Upload session state
//!
//! An [`UploadSession`] is the explicit, session-scoped value threaded through
//! the validator and uploader interfaces: the currently selected file, the
//! last error text, the progress percentage, and the state of the current
//! attempt. Nothing in the pipeline keeps ambient mutable state outside it.
//!
//! Progress inside one attempt is monotone non-decreasing and is reset to 0
//! on terminal completion and on every new selection.

use crate::validate::{Validator, Verdict};
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;

/// A file picked by the caller, with its browser/caller-declared media type.
///
/// Ephemeral: owned by the session and replaced or cleared on each selection.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub payload: Bytes,
}

impl SelectedFile {
    /// Build a descriptor; the size is taken from the payload
    pub fn new(name: &str, content_type: &str, payload: Bytes) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            size: payload.len() as u64,
            payload,
        }
    }
}

/// State of one upload attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

/// Session shared between the caller, its progress sink, and the uploader
pub type SharedSession = Arc<Mutex<UploadSession>>;

/// Session-scoped upload state
#[derive(Debug, Default)]
pub struct UploadSession {
    state: UploadState,
    selected: Option<SelectedFile>,
    error: Option<String>,
    progress_pct: u8,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// New session behind the shared handle the uploader expects
    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Validate a candidate and store it as the selected file.
    ///
    /// A rejected candidate clears the slot and records the rejection reason;
    /// either way the previous selection, error, and progress are discarded.
    pub fn select(session: &SharedSession, file: SelectedFile, validator: &Validator) -> Verdict {
        let verdict = validator.check(&file);
        let mut session = session.lock();
        session.progress_pct = 0;
        session.state = UploadState::Idle;
        match &verdict {
            Verdict::Accepted => {
                session.selected = Some(file);
                session.error = None;
            }
            Verdict::Rejected(reason) => {
                session.selected = None;
                session.error = Some(reason.to_string());
            }
        }
        verdict
    }

    /// Clone out the selected file, if any
    pub fn selected(&self) -> Option<SelectedFile> {
        self.selected.clone()
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current progress percentage in [0, 100]
    pub fn progress(&self) -> u8 {
        self.progress_pct
    }

    /// Mark the session as uploading and reset progress for the new attempt
    pub fn begin_attempt(&mut self) {
        self.state = UploadState::Uploading;
        self.error = None;
        self.progress_pct = 0;
    }

    /// Fold a progress tick into the session, enforcing monotonicity within
    /// the attempt. Returns the effective percentage.
    pub fn record_progress(&mut self, pct: u8) -> u8 {
        let pct = pct.min(100);
        if pct > self.progress_pct {
            self.progress_pct = pct;
        }
        self.progress_pct
    }

    /// Terminal success: progress resets to 0
    pub fn finish_success(&mut self) {
        self.state = UploadState::Succeeded;
        self.error = None;
        self.progress_pct = 0;
    }

    /// Terminal failure with the underlying reason
    pub fn finish_failure(&mut self, reason: &str) {
        self.state = UploadState::Failed;
        self.error = Some(reason.to_string());
        self.progress_pct = 0;
    }

    /// Record an error without an attempt having run (e.g. no file selected)
    pub fn set_error(&mut self, reason: &str) {
        self.error = Some(reason.to_string());
    }
}
