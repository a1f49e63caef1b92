//! Media key reservation state machine.
//!
//! A [`MediaKeyManager`] reserves exclusive access to the fixed set of
//! hardware media keys and routes their press/release events to a single
//! registered callback until the reservation is released. The manager is an
//! owned value, not a process-wide static; create one at the application's
//! composition root and keep it alive for the lifetime of the reservation.

use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};

use crate::backend::{KeyGrabBackend, SubscriptionHandle, SurfaceHandle};
use crate::error::{map_backend_error, MediaKeyError};
use crate::key::{MediaKey, MediaKeyState, MEDIA_KEY_NAMES};

/// Callback invoked for each media key event while a reservation is held
pub type MediaKeyCallback = Arc<dyn Fn(MediaKey, MediaKeyState) + Send + Sync>;

/// Title given to the input surface registered with the windowing system
const SURFACE_TITLE: &str = "media key receiver";

/// Manager for an exclusive media key reservation
///
/// At most one callback is active per manager, and a process should hold at
/// most one manager over a real backend, since the grabs it takes are
/// exclusive system-wide.
pub struct MediaKeyManager<B: KeyGrabBackend> {
    /// The backend used for surface, grab, and subscription operations
    pub backend: B,
    /// Input surface, present iff the manager is initialized
    surface: Option<SurfaceHandle>,
    /// Key-down subscription; present together with `up_subscription`
    down_subscription: Option<SubscriptionHandle>,
    /// Key-up subscription; present together with `down_subscription`
    up_subscription: Option<SubscriptionHandle>,
    /// Callback slot, shared with the subscription handlers
    callback: Arc<Mutex<Option<MediaKeyCallback>>>,
}

impl<B: KeyGrabBackend> MediaKeyManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            surface: None,
            down_subscription: None,
            up_subscription: None,
            callback: Arc::new(Mutex::new(None)),
        }
    }

    /// Reserve the media keys and register `callback` for their events.
    ///
    /// Any existing reservation is released first: the platform silently
    /// ignores repeated exclusive grabs on an already-grabbed key, so stale
    /// grabs must be dropped for the new callback to receive events. A
    /// failure of that internal release is logged and does not abort the
    /// reserve.
    ///
    /// Returns `OperationFailed` if the input surface cannot be created or
    /// any key cannot be grabbed. On a partial grab failure every key
    /// grabbed so far is ungrabbed again before returning; the caller never
    /// observes a partial reservation.
    pub fn reserve<F>(&mut self, callback: F) -> Result<(), MediaKeyError>
    where
        F: Fn(MediaKey, MediaKeyState) + Send + Sync + 'static,
    {
        if let Err(err) = self.release() {
            warn!("failed to release media keys before reserve: {}", err);
        }

        let surface = self.ensure_surface()?;

        if let Err(err) = self.grab_all(surface) {
            error!("failed to reserve media keys: {}", err);
            return Err(map_backend_error(&err));
        }

        // Subscription failure leaves the reservation in place without
        // event delivery; the grabs themselves are the contended resource.
        if let Some((down, up)) = self.subscribe_events() {
            self.down_subscription = Some(down);
            self.up_subscription = Some(up);
        }

        match self.callback.lock() {
            Ok(mut slot) => *slot = Some(Arc::new(callback)),
            Err(_) => {
                return Err(MediaKeyError::OperationFailed(
                    "callback slot poisoned".to_string(),
                ))
            }
        }

        info!("media keys reserved");
        Ok(())
    }

    /// Release the reservation, ungrabbing every key and tearing down the
    /// input surface and event subscriptions.
    ///
    /// Releasing an unreserved manager is a no-op success. Individual
    /// ungrab failures are logged and do not stop the remaining ungrabs;
    /// teardown always completes, and `OperationFailed` is returned
    /// afterwards if any ungrab failed.
    pub fn release(&mut self) -> Result<(), MediaKeyError> {
        let Some(surface) = self.surface.take() else {
            debug!("media keys are not reserved");
            return Ok(());
        };

        let mut failed_ungrabs = 0usize;
        for name in MEDIA_KEY_NAMES {
            if let Err(err) = self.backend.ungrab_key(surface, name) {
                warn!("failed to ungrab key {}: {}", name, err);
                failed_ungrabs += 1;
            }
        }

        if let Err(err) = self.backend.destroy_surface(surface) {
            warn!("failed to destroy input surface: {}", err);
        }

        if let Some(subscription) = self.down_subscription.take() {
            if let Err(err) = self.backend.unsubscribe(subscription) {
                warn!("failed to remove key down handler: {}", err);
            }
        }
        if let Some(subscription) = self.up_subscription.take() {
            if let Err(err) = self.backend.unsubscribe(subscription) {
                warn!("failed to remove key up handler: {}", err);
            }
        }

        match self.callback.lock() {
            Ok(mut slot) => *slot = None,
            Err(_) => warn!("callback slot poisoned during release"),
        }

        if failed_ungrabs > 0 {
            return Err(MediaKeyError::OperationFailed(format!(
                "failed to ungrab {} media keys",
                failed_ungrabs
            )));
        }

        info!("media keys released");
        Ok(())
    }

    /// Whether a callback is currently registered
    pub fn is_reserved(&self) -> bool {
        self.callback
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Create the input surface if it does not exist yet
    fn ensure_surface(&mut self) -> Result<SurfaceHandle, MediaKeyError> {
        if let Some(surface) = self.surface {
            return Ok(surface);
        }

        let surface = self
            .backend
            .create_surface(SURFACE_TITLE, std::process::id())
            .map_err(|err| {
                error!("failed to create input surface: {}", err);
                map_backend_error(&err)
            })?;
        self.surface = Some(surface);
        Ok(surface)
    }

    /// Grab every key in table order, compensating on partial failure so
    /// either all keys are grabbed or none are held afterwards
    fn grab_all(&self, surface: SurfaceHandle) -> Result<(), String> {
        for (index, name) in MEDIA_KEY_NAMES.iter().enumerate() {
            if let Err(err) = self.backend.grab_key(surface, name) {
                error!("failed to grab key {}: {}", name, err);
                for granted in &MEDIA_KEY_NAMES[..index] {
                    if let Err(err) = self.backend.ungrab_key(surface, granted) {
                        warn!("failed to ungrab key {} during rollback: {}", granted, err);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Register the key-down and key-up handlers as a pair.
    ///
    /// Returns `None` (with the partial registration undone) if either
    /// subscription fails; the subscriptions are either both present or
    /// both absent.
    fn subscribe_events(&self) -> Option<(SubscriptionHandle, SubscriptionHandle)> {
        let slot = Arc::clone(&self.callback);
        let down = match self.backend.subscribe(
            MediaKeyState::Pressed,
            Box::new(move |key_name| dispatch(&slot, key_name, MediaKeyState::Pressed)),
        ) {
            Ok(subscription) => subscription,
            Err(err) => {
                warn!("failed to register key down handler: {}", err);
                return None;
            }
        };

        let slot = Arc::clone(&self.callback);
        let up = match self.backend.subscribe(
            MediaKeyState::Released,
            Box::new(move |key_name| dispatch(&slot, key_name, MediaKeyState::Released)),
        ) {
            Ok(subscription) => subscription,
            Err(err) => {
                warn!("failed to register key up handler: {}", err);
                if let Err(err) = self.backend.unsubscribe(down) {
                    warn!("failed to remove orphaned key down handler: {}", err);
                }
                return None;
            }
        };

        Some((down, up))
    }
}

impl<B: KeyGrabBackend> Drop for MediaKeyManager<B> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Resolve a raw key event and hand it to the registered callback.
///
/// Names not in the key table are dropped silently. The callback is cloned
/// out of the slot and invoked outside the lock, synchronously on the
/// thread delivering the event.
fn dispatch(slot: &Mutex<Option<MediaKeyCallback>>, key_name: &str, state: MediaKeyState) {
    let key = MediaKey::from_key_name(key_name);
    if key == MediaKey::Unknown {
        return;
    }

    let callback = match slot.lock() {
        Ok(slot) => slot.clone(),
        Err(_) => return,
    };

    if let Some(callback) = callback {
        callback(key, state);
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
