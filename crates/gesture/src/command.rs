//! Gesture command and stroke path data model

use crate::{DispatchError, DispatchResult};

/// Point in device pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Ordered motion path for a single stroke.
///
/// Built per command and handed to the injector; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokePath {
    pub points: Vec<Point>,
    /// Delay before the stroke starts, in milliseconds.
    pub start_delay_ms: u64,
    /// Time the platform takes to animate the path, in milliseconds.
    pub duration_ms: u64,
}

impl StrokePath {
    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

/// An abstract pointer gesture requested by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureCommand {
    Tap {
        x: i32,
        y: i32,
    },
    Swipe {
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        duration_ms: u64,
    },
}

impl GestureCommand {
    /// Check the command against the input pipeline's constraints:
    /// coordinates are non-negative device pixels and a swipe animates
    /// over at least one millisecond.
    pub fn validate(&self) -> DispatchResult<()> {
        match *self {
            GestureCommand::Tap { x, y } => {
                if x < 0 || y < 0 {
                    return Err(DispatchError::InjectionRejected(format!(
                        "tap coordinates must be non-negative, got ({x}, {y})"
                    )));
                }
            }
            GestureCommand::Swipe {
                start_x,
                start_y,
                end_x,
                end_y,
                duration_ms,
            } => {
                if start_x < 0 || start_y < 0 || end_x < 0 || end_y < 0 {
                    return Err(DispatchError::InjectionRejected(format!(
                        "swipe coordinates must be non-negative, got ({start_x}, {start_y}) -> ({end_x}, {end_y})"
                    )));
                }
                if duration_ms == 0 {
                    return Err(DispatchError::InjectionRejected(
                        "swipe duration must be at least 1 ms".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_with_negative_coordinate_is_rejected() {
        let cmd = GestureCommand::Tap { x: -1, y: 10 };
        assert!(matches!(
            cmd.validate(),
            Err(DispatchError::InjectionRejected(_))
        ));
    }

    #[test]
    fn swipe_with_zero_duration_is_rejected() {
        let cmd = GestureCommand::Swipe {
            start_x: 0,
            start_y: 0,
            end_x: 50,
            end_y: 50,
            duration_ms: 0,
        };
        assert!(matches!(
            cmd.validate(),
            Err(DispatchError::InjectionRejected(_))
        ));
    }

    #[test]
    fn valid_commands_pass() {
        assert!(GestureCommand::Tap { x: 0, y: 0 }.validate().is_ok());
        assert!(GestureCommand::Swipe {
            start_x: 10,
            start_y: 20,
            end_x: 30,
            end_y: 40,
            duration_ms: 1,
        }
        .validate()
        .is_ok());
    }
}
