//! TapBridge binary
//!
//! Thin stand-in for the external command-transport collaborator: serves
//! JSON-lines requests on stdin/stdout against the gesture/overlay core.
//! The platform automation endpoint is connected at startup and owned here
//! for the life of the process, mirroring the host service lifecycle.

use bridge::{
    logging, on_capability_connected, on_capability_disconnected, registry,
    AutomationCapability, CommandHandler, CommandRequest, CommandResponse, Settings,
};
use overlay::{CursorOverlay, SurfaceHost};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const SETTINGS_FILE: &str = "tapbridge.json";

fn main() -> anyhow::Result<()> {
    let use_stub = std::env::args().any(|arg| arg == "--stub");

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    logging::init(settings.debug_logging);

    // The endpoint is owned by this scope; the registry only holds a weak
    // reference to it.
    let endpoint = platform_endpoint(use_stub);
    on_capability_connected(&endpoint);

    let overlay = CursorOverlay::with_glyph_size(surface_host(use_stub), settings.cursor_size);
    let mut handler = CommandHandler::new(registry(), overlay, &settings);

    info!(stub = use_stub, "tapbridge ready");
    serve(&mut handler)?;

    on_capability_disconnected();
    Ok(())
}

#[cfg(windows)]
fn platform_endpoint(use_stub: bool) -> Arc<AutomationCapability> {
    if use_stub {
        Arc::new(gesture::StubInjector)
    } else {
        Arc::new(gesture::Win32Injector::new())
    }
}

#[cfg(not(windows))]
fn platform_endpoint(_use_stub: bool) -> Arc<AutomationCapability> {
    Arc::new(gesture::StubInjector)
}

#[cfg(windows)]
fn surface_host(use_stub: bool) -> Box<dyn SurfaceHost> {
    if use_stub {
        Box::new(overlay::StubSurfaceHost)
    } else {
        Box::new(overlay::Win32SurfaceHost::new())
    }
}

#[cfg(not(windows))]
fn surface_host(_use_stub: bool) -> Box<dyn SurfaceHost> {
    Box::new(overlay::StubSurfaceHost)
}

fn serve(handler: &mut CommandHandler) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<CommandRequest>(&line) {
            Ok(request) => handler.handle(&request),
            Err(err) => CommandResponse::error("INVALID_REQUEST", err.to_string()),
        };
        serde_json::to_writer(&mut stdout, &response)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }
    Ok(())
}
