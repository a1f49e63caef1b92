//! Exclusive media key reservation with press/release callbacks.
//!
//! This crate lets an application reserve the fixed set of hardware media
//! keys (play, stop, pause, next, previous, rewind, fast-forward,
//! play-pause, media) for itself and receive their press/release events
//! through a typed callback until it releases the reservation. The grabs
//! are exclusive: while held, the keys are routed to this process and
//! suppressed elsewhere.
//!
//! ```no_run
//! use mediakeys::{GlobalHotKeyBackend, MediaKeyManager};
//!
//! let mut manager = MediaKeyManager::new(GlobalHotKeyBackend::new());
//! manager.reserve(|key, state| {
//!     println!("{:?} {:?}", key, state);
//! })?;
//! // ... run the application ...
//! manager.release()?;
//! # Ok::<(), mediakeys::MediaKeyError>(())
//! ```

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod backend;
mod error;
mod key;
mod manager;

pub use backend::{
    GlobalHotKeyBackend, KeyEventHandler, KeyGrabBackend, SubscriptionHandle, SurfaceHandle,
};
pub use error::MediaKeyError;
pub use key::{MediaKey, MediaKeyState, MEDIA_KEY_NAMES};
pub use manager::{MediaKeyCallback, MediaKeyManager};
