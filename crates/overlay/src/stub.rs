//! Logging surface host for platforms without an overlay backend

use crate::surface::{SurfaceHandle, SurfaceHost, SurfaceSpec};
use crate::OverlayResult;
use tracing::info;

/// Pretends to create overlay surfaces and logs every operation.
#[derive(Debug, Default)]
pub struct StubSurfaceHost;

struct StubSurface {
    anchor: (i32, i32),
}

impl SurfaceHandle for StubSurface {
    fn move_to(&mut self, anchor_x: i32, anchor_y: i32) {
        self.anchor = (anchor_x, anchor_y);
        info!(anchor_x, anchor_y, "stub: overlay moved");
    }

    fn anchor(&self) -> (i32, i32) {
        self.anchor
    }
}

impl Drop for StubSurface {
    fn drop(&mut self) {
        info!("stub: overlay destroyed");
    }
}

impl SurfaceHost for StubSurfaceHost {
    fn create(&self, spec: &SurfaceSpec) -> OverlayResult<Box<dyn SurfaceHandle>> {
        info!(
            width = spec.width,
            height = spec.height,
            anchor_x = spec.anchor_x,
            anchor_y = spec.anchor_y,
            "stub: overlay created"
        );
        Ok(Box::new(StubSurface {
            anchor: (spec.anchor_x, spec.anchor_y),
        }))
    }
}
