//! Stroke synthesis and dispatch

use crate::command::{GestureCommand, Point, StrokePath};
use crate::DispatchResult;
use tracing::debug;

/// Shortest stroke duration the input pipeline treats as a discrete
/// press-release rather than a held touch.
pub const TAP_DURATION_MS: u64 = 1;

/// OS input-injection seam.
///
/// Implementations submit the stroke asynchronously and report only
/// submission acceptance; the platform animates the motion over the
/// stroke's duration. There is no completion callback and no retry.
pub trait StrokeInjector {
    fn inject_stroke(&self, stroke: &StrokePath) -> DispatchResult<()>;
}

/// Converts gesture commands into stroke paths and submits them.
///
/// Owns no persistent state; every dispatch is independent.
#[derive(Debug, Clone)]
pub struct GestureEngine {
    tap_duration_ms: u64,
}

impl GestureEngine {
    pub fn new() -> Self {
        Self {
            tap_duration_ms: TAP_DURATION_MS,
        }
    }

    /// Build the stroke path for a command.
    ///
    /// Tap yields a single point with the minimal press-release duration;
    /// swipe yields a two-point straight line the platform interpolates
    /// linearly over the command's duration.
    pub fn build_stroke(&self, command: &GestureCommand) -> DispatchResult<StrokePath> {
        command.validate()?;
        let stroke = match *command {
            GestureCommand::Tap { x, y } => StrokePath {
                points: vec![Point::new(x, y)],
                start_delay_ms: 0,
                duration_ms: self.tap_duration_ms,
            },
            GestureCommand::Swipe {
                start_x,
                start_y,
                end_x,
                end_y,
                duration_ms,
            } => StrokePath {
                points: vec![Point::new(start_x, start_y), Point::new(end_x, end_y)],
                start_delay_ms: 0,
                duration_ms,
            },
        };
        Ok(stroke)
    }

    /// Synthesize the stroke for `command` and submit it through `injector`.
    ///
    /// Returns the submission verdict only; the stroke itself runs to
    /// completion (or is dropped by the platform) unobserved.
    pub fn dispatch<I>(&self, injector: &I, command: &GestureCommand) -> DispatchResult<()>
    where
        I: StrokeInjector + ?Sized,
    {
        let stroke = self.build_stroke(command)?;
        debug!(?command, points = stroke.points.len(), duration_ms = stroke.duration_ms, "dispatching stroke");
        injector.inject_stroke(&stroke)
    }
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new()
    }
}
