// Windowing-system seam for media key reservation
//
// The manager never talks to the display server directly; it goes through
// this trait so the grab capability can be swapped (and mocked in tests).

mod global_hotkey_backend;
pub use global_hotkey_backend::GlobalHotKeyBackend;

use crate::key::MediaKeyState;

/// Opaque handle to an input-receiving surface created by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceHandle(pub u64);

/// Opaque handle to a registered key-event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// Handler invoked with the raw platform key name when a subscribed event fires
pub type KeyEventHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Trait for key-grab backends (allows mocking in tests)
///
/// Methods return `Result<_, String>`; the manager classifies the error
/// text into a [`MediaKeyError`](crate::MediaKeyError) variant.
pub trait KeyGrabBackend {
    /// Create a minimal, invisible input surface to register grabs against.
    ///
    /// The surface carries a title and the owning process id for diagnostic
    /// purposes. On failure no partial resource may remain.
    fn create_surface(&self, title: &str, pid: u32) -> Result<SurfaceHandle, String>;

    /// Destroy a surface previously returned by `create_surface`
    fn destroy_surface(&self, surface: SurfaceHandle) -> Result<(), String>;

    /// Exclusively grab a single key by its platform name.
    ///
    /// Repeated exclusive grabs on an already-grabbed key may be silently
    /// ignored by the platform; callers must ungrab before re-grabbing to
    /// guarantee a new event route.
    fn grab_key(&self, surface: SurfaceHandle, key_name: &str) -> Result<(), String>;

    /// Release a single key grab
    fn ungrab_key(&self, surface: SurfaceHandle, key_name: &str) -> Result<(), String>;

    /// Register a process-wide handler for key-down (`Pressed`) or key-up
    /// (`Released`) notifications. The handler receives the raw key name.
    fn subscribe(
        &self,
        state: MediaKeyState,
        handler: KeyEventHandler,
    ) -> Result<SubscriptionHandle, String>;

    /// Remove a handler previously registered with `subscribe`
    fn unsubscribe(&self, subscription: SubscriptionHandle) -> Result<(), String>;
}
