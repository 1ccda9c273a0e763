//! Validator integration tests
//!
//! Covers the accept/reject decision over the declared media type allow-list
//! and the 5 MiB ceiling, including the inclusive boundary.

use bytes::Bytes;
use docdrop::session::SelectedFile;
use docdrop::validate::{RejectReason, Validator, Verdict, DEFAULT_MAX_SIZE_BYTES};

fn file_of(content_type: &str, size: usize) -> SelectedFile {
    SelectedFile::new("candidate.bin", content_type, Bytes::from(vec![0u8; size]))
}

#[test]
fn disallowed_types_are_rejected_regardless_of_size() {
    let validator = Validator::default();
    for content_type in ["image/png", "application/zip", "text/html", ""] {
        for size in [0usize, 1, DEFAULT_MAX_SIZE_BYTES as usize] {
            let verdict = validator.check(&file_of(content_type, size));
            assert!(
                matches!(verdict, Verdict::Rejected(RejectReason::UnsupportedType(_))),
                "expected type rejection for {:?} at {} bytes",
                content_type,
                size
            );
        }
    }
}

#[test]
fn allowed_types_within_ceiling_are_accepted() {
    let validator = Validator::default();
    for content_type in ["application/pdf", "text/plain"] {
        assert!(validator.check(&file_of(content_type, 0)).is_accepted());
        assert!(validator.check(&file_of(content_type, 1024)).is_accepted());
    }
}

#[test]
fn size_ceiling_is_inclusive_at_five_mib() {
    let validator = Validator::default();
    let limit = DEFAULT_MAX_SIZE_BYTES as usize;

    assert!(validator
        .check(&file_of("application/pdf", limit))
        .is_accepted());

    let verdict = validator.check(&file_of("application/pdf", limit + 1));
    assert!(matches!(
        verdict,
        Verdict::Rejected(RejectReason::TooLarge { .. })
    ));
}

#[test]
fn custom_limits_override_the_defaults() {
    let validator = Validator::new(vec!["application/json".into()], 10);

    assert!(validator.check(&file_of("application/json", 10)).is_accepted());
    assert!(!validator.check(&file_of("application/json", 11)).is_accepted());
    assert!(!validator.check(&file_of("application/pdf", 1)).is_accepted());
}
