// global-hotkey based grab backend
//
// This backend performs the actual exclusive grabs through the global-hotkey
// crate (XGrabKey on X11, RegisterHotKey on Windows, CGEventTap on macOS)
// and fans its process-wide event stream out to the registered press/release
// handlers.
//
// Platform note: on Windows and macOS the surface must be created on a
// thread running an event loop; on X11 global-hotkey drives its own
// listener thread.

use super::{KeyEventHandler, KeyGrabBackend, SubscriptionHandle, SurfaceHandle};
use crate::key::MediaKeyState;
use global_hotkey::hotkey::{Code, HotKey};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Type alias for the handler maps shared with the event hook
type HandlerMap = Arc<Mutex<HashMap<SubscriptionHandle, Arc<dyn Fn(&str) + Send + Sync>>>>;

/// Map a platform key name to the keyboard code global-hotkey registers
fn key_code_for(key_name: &str) -> Option<Code> {
    match key_name {
        "XF86AudioPlay" => Some(Code::MediaPlay),
        "XF86AudioStop" => Some(Code::MediaStop),
        "XF86AudioPause" => Some(Code::MediaPause),
        "XF86AudioNext" => Some(Code::MediaTrackNext),
        "XF86AudioPrev" => Some(Code::MediaTrackPrevious),
        "XF86AudioRewind" => Some(Code::MediaRewind),
        "XF86AudioForward" => Some(Code::MediaFastForward),
        "XF86AudioPlayPause" => Some(Code::MediaPlayPause),
        "XF86AudioMedia" => Some(Code::MediaSelect),
        _ => None,
    }
}

/// The live surface: the inner manager owns the platform's hidden event
/// window / display connection, so its lifetime is the surface's lifetime.
struct SurfaceSlot {
    handle: SurfaceHandle,
    manager: GlobalHotKeyManager,
    title: String,
    pid: u32,
}

/// Production backend over the global-hotkey crate
///
/// The event hook installed via `GlobalHotKeyEvent::set_event_handler` is
/// process-wide, so at most one `GlobalHotKeyBackend` should be live in a
/// process at a time.
pub struct GlobalHotKeyBackend {
    /// Current surface, created lazily by `create_surface`
    surface: Mutex<Option<SurfaceSlot>>,
    /// Registered grabs: hotkey id -> (key name, hotkey), shared with the hook
    grabs: Arc<Mutex<HashMap<u32, (String, HotKey)>>>,
    /// Handlers for key press events
    press_handlers: HandlerMap,
    /// Handlers for key release events
    release_handlers: HandlerMap,
    /// Monotonic source for surface and subscription handles
    next_handle: AtomicU64,
    /// Whether the process-wide event hook is installed
    hook_installed: AtomicBool,
}

impl GlobalHotKeyBackend {
    pub fn new() -> Self {
        Self {
            surface: Mutex::new(None),
            grabs: Arc::new(Mutex::new(HashMap::new())),
            press_handlers: Arc::new(Mutex::new(HashMap::new())),
            release_handlers: Arc::new(Mutex::new(HashMap::new())),
            next_handle: AtomicU64::new(1),
            hook_installed: AtomicBool::new(false),
        }
    }

    /// Install the process-wide event hook if not already installed
    fn install_hook(&self) {
        if self.hook_installed.swap(true, Ordering::SeqCst) {
            return;
        }

        let grabs = self.grabs.clone();
        let press_handlers = self.press_handlers.clone();
        let release_handlers = self.release_handlers.clone();

        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            Self::handle_event(&event, &grabs, &press_handlers, &release_handlers);
        }));
    }

    /// Remove the process-wide event hook
    fn uninstall_hook(&self) {
        if !self.hook_installed.swap(false, Ordering::SeqCst) {
            return;
        }
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
    }

    /// Resolve an event to its key name and fan out to the matching handlers
    fn handle_event(
        event: &GlobalHotKeyEvent,
        grabs: &Arc<Mutex<HashMap<u32, (String, HotKey)>>>,
        press_handlers: &HandlerMap,
        release_handlers: &HandlerMap,
    ) {
        let key_name = {
            let grabs_guard = match grabs.lock() {
                Ok(g) => g,
                Err(_) => return,
            };
            match grabs_guard.get(&event.id) {
                Some((name, _)) => name.clone(),
                None => return,
            }
        };

        // Snapshot the handlers so the callbacks run outside the lock
        let handlers: Vec<Arc<dyn Fn(&str) + Send + Sync>> = {
            let map = match event.state {
                HotKeyState::Pressed => press_handlers,
                HotKeyState::Released => release_handlers,
            };
            match map.lock() {
                Ok(g) => g.values().cloned().collect(),
                Err(_) => return,
            }
        };

        for handler in handlers {
            handler(&key_name);
        }
    }
}

impl Default for GlobalHotKeyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyGrabBackend for GlobalHotKeyBackend {
    fn create_surface(&self, title: &str, pid: u32) -> Result<SurfaceHandle, String> {
        let mut surface_guard = self.surface.lock().map_err(|e| e.to_string())?;
        if surface_guard.is_some() {
            return Err("input surface already exists".to_string());
        }

        let manager = GlobalHotKeyManager::new().map_err(|e| e.to_string())?;
        let handle = SurfaceHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));

        debug!("created input surface '{}' for pid {}", title, pid);
        *surface_guard = Some(SurfaceSlot {
            handle,
            manager,
            title: title.to_string(),
            pid,
        });

        Ok(handle)
    }

    fn destroy_surface(&self, surface: SurfaceHandle) -> Result<(), String> {
        let mut surface_guard = self.surface.lock().map_err(|e| e.to_string())?;
        if surface_guard.as_ref().map(|slot| slot.handle) != Some(surface) {
            return Err("unknown input surface".to_string());
        }
        let Some(slot) = surface_guard.take() else {
            return Err("unknown input surface".to_string());
        };

        // Drop any grabs still registered before the manager goes away
        let leftover: Vec<(String, HotKey)> = match self.grabs.lock() {
            Ok(mut g) => g.drain().map(|(_, entry)| entry).collect(),
            Err(e) => return Err(e.to_string()),
        };
        for (name, hotkey) in leftover {
            if let Err(err) = slot.manager.unregister(hotkey) {
                warn!("failed to unregister {} while destroying surface: {}", name, err);
            }
        }

        debug!("destroyed input surface '{}' for pid {}", slot.title, slot.pid);
        Ok(())
    }

    fn grab_key(&self, surface: SurfaceHandle, key_name: &str) -> Result<(), String> {
        let code = key_code_for(key_name).ok_or_else(|| format!("invalid key name: {}", key_name))?;

        let surface_guard = self.surface.lock().map_err(|e| e.to_string())?;
        let slot = match surface_guard.as_ref() {
            Some(slot) if slot.handle == surface => slot,
            _ => return Err("unknown input surface".to_string()),
        };

        let hotkey = HotKey::new(None, code);
        slot.manager.register(hotkey).map_err(|e| e.to_string())?;

        self.grabs
            .lock()
            .map_err(|e| e.to_string())?
            .insert(hotkey.id(), (key_name.to_string(), hotkey));
        Ok(())
    }

    fn ungrab_key(&self, surface: SurfaceHandle, key_name: &str) -> Result<(), String> {
        let surface_guard = self.surface.lock().map_err(|e| e.to_string())?;
        let slot = match surface_guard.as_ref() {
            Some(slot) if slot.handle == surface => slot,
            _ => return Err("unknown input surface".to_string()),
        };

        let registered = {
            let mut grabs_guard = self.grabs.lock().map_err(|e| e.to_string())?;
            let id = grabs_guard
                .iter()
                .find(|(_, (name, _))| name == key_name)
                .map(|(&id, _)| id);
            id.and_then(|id| grabs_guard.remove(&id))
        };

        match registered {
            Some((name, hotkey)) => slot.manager.unregister(hotkey).map_err(|e| {
                debug!("unregister of {} reported: {}", name, e);
                e.to_string()
            }),
            // Ungrabbing a key that is not grabbed is a silent no-op,
            // matching the display server's ungrab semantics.
            None => Ok(()),
        }
    }

    fn subscribe(
        &self,
        state: MediaKeyState,
        handler: KeyEventHandler,
    ) -> Result<SubscriptionHandle, String> {
        let map = match state {
            MediaKeyState::Pressed => &self.press_handlers,
            MediaKeyState::Released => &self.release_handlers,
        };

        let subscription = SubscriptionHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        map.lock()
            .map_err(|e| e.to_string())?
            .insert(subscription, Arc::from(handler));

        self.install_hook();
        Ok(subscription)
    }

    fn unsubscribe(&self, subscription: SubscriptionHandle) -> Result<(), String> {
        let mut press_guard = self.press_handlers.lock().map_err(|e| e.to_string())?;
        let mut release_guard = self.release_handlers.lock().map_err(|e| e.to_string())?;

        let removed = press_guard.remove(&subscription).is_some()
            || release_guard.remove(&subscription).is_some();
        if !removed {
            return Err("unknown subscription".to_string());
        }

        if press_guard.is_empty() && release_guard.is_empty() {
            self.uninstall_hook();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "global_hotkey_backend_test.rs"]
mod tests;
