// Tests for backend error classification
#![cfg_attr(coverage_nightly, coverage(off))]

use super::*;

#[test]
fn test_map_invalid_argument() {
    assert_eq!(
        map_backend_error("invalid key name: XF86Bogus"),
        MediaKeyError::InvalidParameter("invalid key name: XF86Bogus".to_string())
    );
}

#[test]
fn test_map_invalid_is_case_insensitive() {
    assert!(matches!(
        map_backend_error("Invalid surface handle"),
        MediaKeyError::InvalidParameter(_)
    ));
}

#[test]
fn test_map_unknown_error() {
    assert!(matches!(
        map_backend_error("grab refused: XF86AudioPlay"),
        MediaKeyError::OperationFailed(_)
    ));
}

#[test]
fn test_error_display_includes_backend_text() {
    let err = map_backend_error("window create failed");
    assert_eq!(err.to_string(), "Operation failed: window create failed");

    let err = map_backend_error("invalid key name: Foo");
    assert_eq!(err.to_string(), "Invalid parameter: invalid key name: Foo");
}
