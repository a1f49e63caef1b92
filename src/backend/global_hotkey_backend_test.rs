// Tests for the global-hotkey backend
//
// Only the OS-free paths are exercised here: name mapping, surface handle
// validation, and subscription bookkeeping. Creating a real surface needs a
// display connection and is covered by manual testing.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::*;
use crate::key::MEDIA_KEY_NAMES;
use serial_test::serial;
use std::collections::HashSet;

#[test]
fn every_reservable_name_has_a_key_code() {
    let codes: Vec<Code> = MEDIA_KEY_NAMES
        .iter()
        .map(|name| key_code_for(name).unwrap_or_else(|| panic!("{} must map", name)))
        .collect();

    let distinct: HashSet<Code> = codes.iter().copied().collect();
    assert_eq!(distinct.len(), MEDIA_KEY_NAMES.len(), "codes must be unique");
}

#[test]
fn expected_key_codes_for_known_names() {
    assert_eq!(key_code_for("XF86AudioPlay"), Some(Code::MediaPlay));
    assert_eq!(key_code_for("XF86AudioPrev"), Some(Code::MediaTrackPrevious));
    assert_eq!(
        key_code_for("XF86AudioPlayPause"),
        Some(Code::MediaPlayPause)
    );
    assert_eq!(key_code_for("XF86AudioMedia"), Some(Code::MediaSelect));
}

#[test]
fn unknown_names_have_no_key_code() {
    assert_eq!(key_code_for("XF86Something"), None);
    assert_eq!(key_code_for(""), None);
}

#[test]
fn grab_rejects_unknown_key_names() {
    let backend = GlobalHotKeyBackend::new();
    let err = backend
        .grab_key(SurfaceHandle(1), "XF86Bogus")
        .unwrap_err();
    assert!(err.contains("invalid key name"), "got: {}", err);
}

#[test]
fn grab_and_ungrab_require_a_live_surface() {
    let backend = GlobalHotKeyBackend::new();
    assert!(backend
        .grab_key(SurfaceHandle(7), "XF86AudioPlay")
        .is_err());
    assert!(backend
        .ungrab_key(SurfaceHandle(7), "XF86AudioPlay")
        .is_err());
    assert!(backend.destroy_surface(SurfaceHandle(7)).is_err());
}

#[test]
#[serial]
fn subscriptions_allocate_distinct_handles() {
    let backend = GlobalHotKeyBackend::new();
    let down = backend
        .subscribe(MediaKeyState::Pressed, Box::new(|_| {}))
        .unwrap();
    let up = backend
        .subscribe(MediaKeyState::Released, Box::new(|_| {}))
        .unwrap();
    assert_ne!(down, up);

    assert_eq!(backend.unsubscribe(down), Ok(()));
    assert_eq!(backend.unsubscribe(up), Ok(()));
}

#[test]
#[serial]
fn unsubscribe_of_unknown_handle_fails() {
    let backend = GlobalHotKeyBackend::new();
    assert!(backend.unsubscribe(SubscriptionHandle(42)).is_err());

    // A removed subscription cannot be removed twice
    let down = backend
        .subscribe(MediaKeyState::Pressed, Box::new(|_| {}))
        .unwrap();
    assert_eq!(backend.unsubscribe(down), Ok(()));
    assert!(backend.unsubscribe(down).is_err());
}
