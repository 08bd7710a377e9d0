//! TapBridge - remote pointer-gesture bridge
//!
//! Accepts tap/swipe commands from an external controller, injects them
//! into the OS input pipeline, and mirrors the intended pointer position
//! with a click-through cursor overlay. Gesture and overlay access is
//! gated by the automation endpoint registry.

pub mod logging;
pub mod registry;
pub mod settings;
pub mod transport;

pub use registry::{
    on_capability_connected, on_capability_disconnected, registry, AutomationCapability,
    EndpointRegistry,
};
pub use settings::Settings;
pub use transport::{CommandHandler, CommandRequest, CommandResponse};
