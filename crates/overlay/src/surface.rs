//! Host-platform window-surface seam

use crate::OverlayResult;

/// Configuration requested for an overlay surface.
///
/// The flags mirror what an input-inert feedback window needs: it must sit
/// above everything, never take focus, and pass every touch through to the
/// application beneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub width: i32,
    pub height: i32,
    /// Top-left anchor in device pixels; may be negative near screen edges.
    pub anchor_x: i32,
    pub anchor_y: i32,
    pub always_on_top: bool,
    pub focusable: bool,
    pub touch_transparent: bool,
}

impl SurfaceSpec {
    /// Request for a square cursor glyph anchored at the given point.
    pub fn cursor_glyph(size: i32, anchor_x: i32, anchor_y: i32) -> Self {
        Self {
            width: size,
            height: size,
            anchor_x,
            anchor_y,
            always_on_top: true,
            focusable: false,
            touch_transparent: true,
        }
    }
}

/// A created overlay surface. Dropping the handle releases the window
/// resource, so a handle can never outlive its owner's `Visible` state.
pub trait SurfaceHandle {
    /// Re-anchor the existing window without recreating it. Layout-only;
    /// a failed move is logged by the backend, not surfaced.
    fn move_to(&mut self, anchor_x: i32, anchor_y: i32);

    /// Current top-left anchor.
    fn anchor(&self) -> (i32, i32);
}

/// Factory for overlay surfaces on the host platform.
pub trait SurfaceHost {
    fn create(&self, spec: &SurfaceSpec) -> OverlayResult<Box<dyn SurfaceHandle>>;
}
