//! Gesture synthesis for TapBridge
//!
//! Turns abstract tap/swipe commands into single-stroke input paths and
//! submits them to the OS input-injection facility.

pub mod command;
pub mod engine;
pub mod stub;
#[cfg(windows)]
pub mod win32;

pub use command::{GestureCommand, Point, StrokePath};
pub use engine::{GestureEngine, StrokeInjector, TAP_DURATION_MS};
pub use stub::StubInjector;
#[cfg(windows)]
pub use win32::Win32Injector;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No automation endpoint is currently connected.
    #[error("no automation endpoint connected")]
    NoCapability,

    /// The platform input pipeline declined the synthesized stroke.
    #[error("input injection rejected: {0}")]
    InjectionRejected(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
