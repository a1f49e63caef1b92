//! Media key identifiers and the platform key-name table.
//!
//! The windowing system reports media keys as `XF86Audio*` name strings;
//! this module owns the fixed table mapping those names to the abstract
//! identifiers the callback API exposes.

use serde::{Deserialize, Serialize};

/// Platform-independent media-control key resolved from a key name string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKey {
    Play,
    Stop,
    Pause,
    Next,
    Previous,
    Rewind,
    FastForward,
    PlayPause,
    Media,
    /// Key name not present in the table; never delivered to callbacks
    Unknown,
}

/// Whether a key event is a press or a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKeyState {
    Pressed,
    Released,
}

/// Key-name table, in grab order. No duplicate names.
const KEY_TABLE: &[(&str, MediaKey)] = &[
    ("XF86AudioPlay", MediaKey::Play),
    ("XF86AudioStop", MediaKey::Stop),
    ("XF86AudioPause", MediaKey::Pause),
    ("XF86AudioNext", MediaKey::Next),
    ("XF86AudioPrev", MediaKey::Previous),
    ("XF86AudioRewind", MediaKey::Rewind),
    ("XF86AudioForward", MediaKey::FastForward),
    ("XF86AudioPlayPause", MediaKey::PlayPause),
    ("XF86AudioMedia", MediaKey::Media),
];

/// The reservable key names, in the order they are grabbed
pub const MEDIA_KEY_NAMES: &[&str] = &[
    "XF86AudioPlay",
    "XF86AudioStop",
    "XF86AudioPause",
    "XF86AudioNext",
    "XF86AudioPrev",
    "XF86AudioRewind",
    "XF86AudioForward",
    "XF86AudioPlayPause",
    "XF86AudioMedia",
];

impl MediaKey {
    /// Resolve a platform key name string to its identifier
    ///
    /// Exact string match against the key table; names not in the table
    /// resolve to `MediaKey::Unknown`.
    pub fn from_key_name(name: &str) -> MediaKey {
        KEY_TABLE
            .iter()
            .find(|(table_name, _)| *table_name == name)
            .map(|&(_, key)| key)
            .unwrap_or(MediaKey::Unknown)
    }

    /// The platform key name for this identifier, `None` for `Unknown`
    pub fn key_name(self) -> Option<&'static str> {
        KEY_TABLE
            .iter()
            .find(|&&(_, key)| key == self)
            .map(|&(name, _)| name)
    }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod tests;
