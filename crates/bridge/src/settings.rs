//! Bridge settings

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cursor glyph footprint in device pixels.
    pub cursor_size: i32,
    /// Swipe duration applied when the controller omits `durationMs`.
    pub default_swipe_duration_ms: u64,
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cursor_size: 80,
            default_swipe_duration_ms: 300,
            debug_logging: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing or unreadable file falls
    /// back to defaults; a corrupt one does too, with a warning.
    pub fn load(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(path = %path.display(), %err, "invalid settings file, using defaults");
                Self::default()
            }
        }
    }
}
