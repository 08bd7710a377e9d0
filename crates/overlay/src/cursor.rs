//! Cursor overlay state machine

use crate::surface::{SurfaceHandle, SurfaceHost, SurfaceSpec};
use crate::{OverlayError, OverlayResult};
use tracing::{debug, warn};

/// Cursor glyph footprint in device pixels.
pub const DEFAULT_GLYPH_SIZE: i32 = 80;

enum OverlayState {
    Hidden,
    Visible {
        x: i32,
        y: i32,
        surface: Box<dyn SurfaceHandle>,
    },
}

/// Owns the overlay window lifecycle.
///
/// Transitions happen only through `show`/`hide`/`update_position`; the
/// window resource lives exclusively inside the `Visible` state, so there
/// is never a half-built or leaked surface.
pub struct CursorOverlay {
    host: Box<dyn SurfaceHost>,
    glyph_size: i32,
    state: OverlayState,
}

impl CursorOverlay {
    pub fn new(host: Box<dyn SurfaceHost>) -> Self {
        Self {
            host,
            glyph_size: DEFAULT_GLYPH_SIZE,
            state: OverlayState::Hidden,
        }
    }

    pub fn with_glyph_size(host: Box<dyn SurfaceHost>, glyph_size: i32) -> Self {
        Self {
            host,
            glyph_size: glyph_size.max(1),
            state: OverlayState::Hidden,
        }
    }

    /// Create the overlay window at the default position.
    ///
    /// Idempotent: a second `show` while visible is a no-op, so exactly one
    /// surface ever exists. A creation failure (missing overlay permission)
    /// leaves the state `Hidden` and surfaces as `Unavailable`.
    pub fn show(&mut self) -> OverlayResult<()> {
        if matches!(self.state, OverlayState::Visible { .. }) {
            return Ok(());
        }
        let spec = SurfaceSpec::cursor_glyph(self.glyph_size, 0, 0);
        match self.host.create(&spec) {
            Ok(surface) => {
                debug!(size = self.glyph_size, "overlay shown");
                self.state = OverlayState::Visible { x: 0, y: 0, surface };
                Ok(())
            }
            Err(OverlayError::Unavailable(reason)) => {
                warn!(%reason, "overlay surface creation failed");
                Err(OverlayError::Unavailable(reason))
            }
        }
    }

    /// Release the overlay window. No-op when already hidden.
    pub fn hide(&mut self) {
        if let OverlayState::Visible { surface, .. } =
            std::mem::replace(&mut self.state, OverlayState::Hidden)
        {
            drop(surface);
            debug!("overlay hidden");
        }
    }

    /// Center the glyph on the given pointer coordinate.
    ///
    /// The anchor is `(x - glyph/2, y - glyph/2)` with integer floor
    /// division so the glyph lines up exactly with gesture coordinates;
    /// negative anchors near screen edges are legal. No-op when hidden.
    pub fn update_position(&mut self, x: i32, y: i32) {
        if let OverlayState::Visible {
            x: pos_x,
            y: pos_y,
            surface,
        } = &mut self.state
        {
            let half = self.glyph_size / 2;
            surface.move_to(x - half, y - half);
            *pos_x = x;
            *pos_y = y;
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, OverlayState::Visible { .. })
    }

    /// Logical pointer position the glyph is centered on, if visible.
    pub fn position(&self) -> Option<(i32, i32)> {
        match self.state {
            OverlayState::Visible { x, y, .. } => Some((x, y)),
            OverlayState::Hidden => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct HostLog {
        created: usize,
        dropped: usize,
        moves: Vec<(i32, i32)>,
        specs: Vec<SurfaceSpec>,
    }

    struct FakeHost {
        log: Rc<RefCell<HostLog>>,
        fail: bool,
    }

    struct FakeSurface {
        log: Rc<RefCell<HostLog>>,
        anchor: (i32, i32),
    }

    impl SurfaceHandle for FakeSurface {
        fn move_to(&mut self, anchor_x: i32, anchor_y: i32) {
            self.anchor = (anchor_x, anchor_y);
            self.log.borrow_mut().moves.push((anchor_x, anchor_y));
        }

        fn anchor(&self) -> (i32, i32) {
            self.anchor
        }
    }

    impl Drop for FakeSurface {
        fn drop(&mut self) {
            self.log.borrow_mut().dropped += 1;
        }
    }

    impl SurfaceHost for FakeHost {
        fn create(&self, spec: &SurfaceSpec) -> OverlayResult<Box<dyn SurfaceHandle>> {
            if self.fail {
                return Err(OverlayError::Unavailable("permission denied".into()));
            }
            let mut log = self.log.borrow_mut();
            log.created += 1;
            log.specs.push(*spec);
            Ok(Box::new(FakeSurface {
                log: Rc::clone(&self.log),
                anchor: (spec.anchor_x, spec.anchor_y),
            }))
        }
    }

    fn overlay(fail: bool) -> (CursorOverlay, Rc<RefCell<HostLog>>) {
        let log = Rc::new(RefCell::new(HostLog::default()));
        let host = FakeHost {
            log: Rc::clone(&log),
            fail,
        };
        (CursorOverlay::new(Box::new(host)), log)
    }

    #[test]
    fn show_is_idempotent() {
        let (mut overlay, log) = overlay(false);
        overlay.show().unwrap();
        overlay.show().unwrap();
        assert!(overlay.is_visible());
        assert_eq!(log.borrow().created, 1);
    }

    #[test]
    fn show_requests_inert_topmost_surface() {
        let (mut overlay, log) = overlay(false);
        overlay.show().unwrap();
        let log = log.borrow();
        let spec = &log.specs[0];
        assert_eq!((spec.width, spec.height), (80, 80));
        assert_eq!((spec.anchor_x, spec.anchor_y), (0, 0));
        assert!(spec.always_on_top);
        assert!(!spec.focusable);
        assert!(spec.touch_transparent);
    }

    #[test]
    fn failed_show_leaves_state_hidden() {
        let (mut overlay, log) = overlay(true);
        assert!(matches!(
            overlay.show(),
            Err(OverlayError::Unavailable(_))
        ));
        assert!(!overlay.is_visible());
        assert_eq!(log.borrow().created, 0);
    }

    #[test]
    fn hide_releases_surface_once() {
        let (mut overlay, log) = overlay(false);
        overlay.show().unwrap();
        overlay.hide();
        assert!(!overlay.is_visible());
        assert_eq!(log.borrow().dropped, 1);
        // Hidden hide is a no-op, nothing further released.
        overlay.hide();
        assert_eq!(log.borrow().dropped, 1);
    }

    #[test]
    fn update_position_centers_glyph() {
        let (mut overlay, log) = overlay(false);
        overlay.show().unwrap();
        overlay.update_position(100, 200);
        assert_eq!(log.borrow().moves, vec![(60, 160)]);
        assert_eq!(overlay.position(), Some((100, 200)));
    }

    #[test]
    fn update_position_permits_negative_anchor_near_edges() {
        let (mut overlay, log) = overlay(false);
        overlay.show().unwrap();
        overlay.update_position(10, 10);
        assert_eq!(log.borrow().moves, vec![(-30, -30)]);
    }

    #[test]
    fn update_position_while_hidden_is_noop() {
        let (mut overlay, log) = overlay(false);
        overlay.update_position(10, 10);
        assert!(log.borrow().moves.is_empty());
        assert_eq!(overlay.position(), None);
    }

    #[test]
    fn custom_glyph_size_changes_centering() {
        let log = Rc::new(RefCell::new(HostLog::default()));
        let host = FakeHost {
            log: Rc::clone(&log),
            fail: false,
        };
        let mut overlay = CursorOverlay::with_glyph_size(Box::new(host), 50);
        overlay.show().unwrap();
        overlay.update_position(100, 100);
        assert_eq!(log.borrow().moves, vec![(75, 75)]);
    }
}
