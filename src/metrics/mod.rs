//! Metrics module
//!
//! Prometheus counters and histograms for the upload pipeline, with a text
//! exposition helper for embedding hosts.

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Histogram,
    TextEncoder,
};

lazy_static! {
    // Upload metrics
    pub static ref UPLOADS_TOTAL: CounterVec = register_counter_vec!(
        "docdrop_uploads_total",
        "Total number of upload attempts",
        &["status"]
    ).unwrap();

    pub static ref UPLOAD_BYTES_TOTAL: Counter = register_counter!(
        "docdrop_upload_bytes_total",
        "Total bytes uploaded"
    ).unwrap();

    pub static ref UPLOAD_DURATION: Histogram = register_histogram!(
        "docdrop_upload_duration_seconds",
        "Upload duration in seconds",
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]
    ).unwrap();

    // Validation metrics
    pub static ref VALIDATION_REJECTIONS: CounterVec = register_counter_vec!(
        "docdrop_validation_rejections_total",
        "Files rejected before upload",
        &["reason"]  // "type" or "size"
    ).unwrap();

    // Record metrics
    pub static ref RECORD_WRITES: CounterVec = register_counter_vec!(
        "docdrop_record_writes_total",
        "Metadata record appends",
        &["status"]
    ).unwrap();

    pub static ref COMPENSATING_DELETES: Counter = register_counter!(
        "docdrop_compensating_deletes_total",
        "Objects deleted after a failed record append"
    ).unwrap();
}

/// Record a successful upload
pub fn record_upload_success(bytes: u64) {
    UPLOADS_TOTAL.with_label_values(&["success"]).inc();
    UPLOAD_BYTES_TOTAL.inc_by(bytes as f64);
}

/// Record a failed upload
pub fn record_upload_failure() {
    UPLOADS_TOTAL.with_label_values(&["failure"]).inc();
}

/// Record upload duration
pub fn record_upload_duration(duration_secs: f64) {
    UPLOAD_DURATION.observe(duration_secs);
}

/// Record a validation rejection
pub fn record_validation_rejection(reason: &str) {
    VALIDATION_REJECTIONS.with_label_values(&[reason]).inc();
}

/// Record a metadata append outcome
pub fn record_record_write(success: bool) {
    let status = if success { "success" } else { "failure" };
    RECORD_WRITES.with_label_values(&[status]).inc();
}

/// Record a compensating delete after a failed record append
pub fn record_compensating_delete() {
    COMPENSATING_DELETES.inc();
}

/// Render all registered metrics in the Prometheus text format
pub fn export() -> String {
    let encoder = TextEncoder::new();
    encoder
        .encode_to_string(&prometheus::gather())
        .unwrap_or_default()
}
