//! Logging no-op injector for platforms without an input-injection backend

use crate::command::StrokePath;
use crate::engine::StrokeInjector;
use crate::DispatchResult;
use tracing::info;

/// Accepts every stroke and logs it instead of touching the OS.
///
/// Used off-Windows and behind `--stub` so the transport path can be
/// exercised end to end without injection side effects.
#[derive(Debug, Default)]
pub struct StubInjector;

impl StrokeInjector for StubInjector {
    fn inject_stroke(&self, stroke: &StrokePath) -> DispatchResult<()> {
        info!(
            start = ?stroke.start(),
            end = ?stroke.end(),
            duration_ms = stroke.duration_ms,
            "stub: stroke accepted"
        );
        Ok(())
    }
}
