//! Cursor overlay for TapBridge
//!
//! Owns a single transparent, input-inert, always-on-top window holding a
//! fixed-size cursor glyph that tracks the controller's pointer position.

pub mod cursor;
pub mod stub;
pub mod surface;
#[cfg(windows)]
pub mod win32;

pub use cursor::{CursorOverlay, DEFAULT_GLYPH_SIZE};
pub use stub::StubSurfaceHost;
pub use surface::{SurfaceHandle, SurfaceHost, SurfaceSpec};
#[cfg(windows)]
pub use win32::Win32SurfaceHost;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    /// The overlay window could not be created, typically because the
    /// overlay permission has not been granted. Non-fatal: the overlay
    /// simply stays hidden.
    #[error("overlay window unavailable: {0}")]
    Unavailable(String),
}

pub type OverlayResult<T> = Result<T, OverlayError>;
