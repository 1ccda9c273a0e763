//! Notification surface
//!
//! The transient, auto-dismissing toast of the original UI becomes an
//! observer trait: the uploader reports progress ticks and the terminal
//! outcome, and implementations decide how to surface them.

use crate::records::DocumentRecord;

/// Observer for upload progress and terminal outcomes
pub trait Notifier: Send + Sync {
    /// A progress tick in [0, 100], non-decreasing within one attempt
    fn on_progress(&self, percent: u8);

    /// Upload and record append both completed
    fn on_success(&self, record: &DocumentRecord);

    /// The attempt failed; `reason` carries the underlying cause
    fn on_error(&self, reason: &str);
}

/// Notifier that reports through the tracing subscriber
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn on_progress(&self, percent: u8) {
        tracing::debug!(percent, "upload progress");
    }

    fn on_success(&self, record: &DocumentRecord) {
        tracing::info!(url = %record.url, name = %record.name, "file uploaded successfully");
    }

    fn on_error(&self, reason: &str) {
        tracing::warn!(reason, "upload failed");
    }
}

/// Notifier that prints to stderr, for the CLI
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn on_progress(&self, percent: u8) {
        eprintln!("uploading... {}%", percent);
    }

    fn on_success(&self, record: &DocumentRecord) {
        eprintln!("File uploaded successfully: {}", record.url);
    }

    fn on_error(&self, reason: &str) {
        eprintln!("Upload failed: {}", reason);
    }
}
