//! Command-transport boundary
//!
//! Request/response types and the handler that maps inbound controller
//! commands onto the gesture engine and the cursor overlay. Every failure
//! is converted to a structured error response here; nothing escapes as a
//! panic. The handler is single-threaded by contract: the transport
//! collaborator marshals calls onto one UI-affine thread before invoking it.

use crate::registry::{AutomationCapability, EndpointRegistry};
use crate::settings::Settings;
use gesture::{DispatchError, DispatchResult, GestureCommand, GestureEngine};
use overlay::CursorOverlay;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

pub const CODE_UNAVAILABLE: &str = "UNAVAILABLE";
pub const CODE_INJECTION_REJECTED: &str = "INJECTION_REJECTED";

const MSG_UNAVAILABLE: &str = "automation endpoint is not running or active";

/// Inbound command from the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

/// Outbound result, mirroring the controller channel's
/// success / error / not-implemented tri-state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResponse {
    Success { value: Value },
    Error { code: String, message: String },
    NotImplemented,
}

impl CommandResponse {
    pub fn success(value: Value) -> Self {
        CommandResponse::Success { value }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        CommandResponse::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Maps controller commands onto the core subsystems.
pub struct CommandHandler {
    registry: Arc<EndpointRegistry<AutomationCapability>>,
    engine: GestureEngine,
    overlay: CursorOverlay,
    default_swipe_duration_ms: u64,
}

impl CommandHandler {
    pub fn new(
        registry: Arc<EndpointRegistry<AutomationCapability>>,
        overlay: CursorOverlay,
        settings: &Settings,
    ) -> Self {
        Self {
            registry,
            engine: GestureEngine::new(),
            overlay,
            default_swipe_duration_ms: settings.default_swipe_duration_ms,
        }
    }

    pub fn handle(&mut self, request: &CommandRequest) -> CommandResponse {
        match request.method.as_str() {
            "performTap" => {
                let command = GestureCommand::Tap {
                    x: arg_i32(&request.args, "x"),
                    y: arg_i32(&request.args, "y"),
                };
                self.dispatch_gesture(&command)
            }
            "performSwipe" => {
                let command = GestureCommand::Swipe {
                    start_x: arg_i32(&request.args, "startX"),
                    start_y: arg_i32(&request.args, "startY"),
                    end_x: arg_i32(&request.args, "endX"),
                    end_y: arg_i32(&request.args, "endY"),
                    duration_ms: self.arg_duration(&request.args),
                };
                self.dispatch_gesture(&command)
            }
            "isServiceEnabled" => {
                // Pure probe, never fails.
                CommandResponse::success(json!(self.registry.is_available()))
            }
            "showOverlay" => {
                if !self.registry.is_available() {
                    return CommandResponse::error(CODE_UNAVAILABLE, MSG_UNAVAILABLE);
                }
                if let Err(err) = self.overlay.show() {
                    // Missing overlay permission is non-fatal: the cursor
                    // simply never appears. Gesture dispatch is unaffected.
                    warn!(%err, "overlay stays hidden");
                }
                CommandResponse::success(json!(self.overlay.is_visible()))
            }
            "hideOverlay" => {
                // Ungated: cleanup must work even after a disconnect.
                self.overlay.hide();
                CommandResponse::success(json!(true))
            }
            "updateOverlayPosition" => {
                if !self.registry.is_available() {
                    return CommandResponse::error(CODE_UNAVAILABLE, MSG_UNAVAILABLE);
                }
                self.overlay
                    .update_position(arg_i32(&request.args, "x"), arg_i32(&request.args, "y"));
                CommandResponse::success(json!(true))
            }
            "isOverlayVisible" => CommandResponse::success(json!(self.overlay.is_visible())),
            _ => CommandResponse::NotImplemented,
        }
    }

    fn dispatch_gesture(&self, command: &GestureCommand) -> CommandResponse {
        let result: DispatchResult<()> = self
            .registry
            .with_capability(|capability| self.engine.dispatch(capability, command))
            .and_then(|verdict| verdict);
        match result {
            Ok(()) => CommandResponse::success(json!(true)),
            Err(DispatchError::NoCapability) => {
                CommandResponse::error(CODE_UNAVAILABLE, MSG_UNAVAILABLE)
            }
            Err(DispatchError::InjectionRejected(message)) => {
                CommandResponse::error(CODE_INJECTION_REJECTED, message)
            }
        }
    }

    /// Missing or malformed duration falls back to the configured default;
    /// an explicit non-positive duration is kept so the engine rejects it.
    fn arg_duration(&self, args: &Value) -> u64 {
        match args.get("durationMs").and_then(Value::as_i64) {
            Some(duration) if duration > 0 => duration as u64,
            Some(_) => 0,
            None => self.default_swipe_duration_ms,
        }
    }
}

/// Missing arguments default to 0, matching the controller channel's
/// lenient decoding. A coordinate outside the i32 range maps to -1 so it
/// fails validation instead of aliasing into a valid position.
fn arg_i32(args: &Value, key: &str) -> i32 {
    match args.get(key).and_then(Value::as_i64) {
        None => 0,
        Some(raw) => i32::try_from(raw).unwrap_or(-1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture::{StrokeInjector, StrokePath};
    use overlay::StubSurfaceHost;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RejectingInjector;

    impl StrokeInjector for RejectingInjector {
        fn inject_stroke(&self, _stroke: &StrokePath) -> DispatchResult<()> {
            Err(DispatchError::InjectionRejected("stroke declined".into()))
        }
    }

    #[derive(Default)]
    struct CountingInjector {
        calls: AtomicUsize,
    }

    impl StrokeInjector for CountingInjector {
        fn inject_stroke(&self, _stroke: &StrokePath) -> DispatchResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn handler() -> CommandHandler {
        let registry: Arc<EndpointRegistry<AutomationCapability>> =
            Arc::new(EndpointRegistry::new());
        let overlay = CursorOverlay::new(Box::new(StubSurfaceHost));
        CommandHandler::new(registry, overlay, &Settings::default())
    }

    /// Handler whose registry is connected to the given endpoint; the
    /// caller keeps the owning Arc alive.
    fn connected_handler(capability: &Arc<AutomationCapability>) -> CommandHandler {
        let registry: Arc<EndpointRegistry<AutomationCapability>> =
            Arc::new(EndpointRegistry::new());
        registry.connect(capability);
        let overlay = CursorOverlay::new(Box::new(StubSurfaceHost));
        CommandHandler::new(registry, overlay, &Settings::default())
    }

    fn request(method: &str, args: Value) -> CommandRequest {
        CommandRequest {
            method: method.to_string(),
            args,
        }
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let mut handler = handler();
        let response = handler.handle(&request("recordMacro", Value::Null));
        assert_eq!(response, CommandResponse::NotImplemented);
    }

    #[test]
    fn service_probe_never_fails_while_disconnected() {
        let mut handler = handler();
        let response = handler.handle(&request("isServiceEnabled", Value::Null));
        assert_eq!(response, CommandResponse::success(json!(false)));
    }

    #[test]
    fn tap_without_endpoint_reports_unavailable() {
        let mut handler = handler();
        let response = handler.handle(&request("performTap", json!({"x": 100, "y": 200})));
        match response {
            CommandResponse::Error { code, .. } => assert_eq!(code, CODE_UNAVAILABLE),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn overlay_mutation_is_gated_but_queries_are_not() {
        let mut handler = handler();
        assert!(matches!(
            handler.handle(&request("showOverlay", Value::Null)),
            CommandResponse::Error { .. }
        ));
        assert_eq!(
            handler.handle(&request("isOverlayVisible", Value::Null)),
            CommandResponse::success(json!(false))
        );
        assert_eq!(
            handler.handle(&request("hideOverlay", Value::Null)),
            CommandResponse::success(json!(true))
        );
    }

    #[test]
    fn injection_rejection_maps_to_error_code() {
        let capability: Arc<AutomationCapability> = Arc::new(RejectingInjector);
        let mut handler = connected_handler(&capability);
        let response = handler.handle(&request("performTap", json!({"x": 1, "y": 2})));
        match response {
            CommandResponse::Error { code, message } => {
                assert_eq!(code, CODE_INJECTION_REJECTED);
                assert_eq!(message, "stroke declined");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_coordinate_fails_validation() {
        let endpoint = Arc::new(CountingInjector::default());
        let capability: Arc<AutomationCapability> = endpoint.clone();
        let mut handler = connected_handler(&capability);

        // 2^32 + 5 must not alias into a tap at x=5.
        let response =
            handler.handle(&request("performTap", json!({"x": 4294967301i64, "y": 10})));
        match response {
            CommandResponse::Error { code, .. } => assert_eq!(code, CODE_INJECTION_REJECTED),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_args_default_to_zero_and_default_duration() {
        assert_eq!(arg_i32(&Value::Null, "x"), 0);
        assert_eq!(arg_i32(&json!({"x": 7}), "x"), 7);
        assert_eq!(arg_i32(&json!({"x": 4294967301i64}), "x"), -1);
        assert_eq!(arg_i32(&json!({"x": -4294967301i64}), "x"), -1);

        let handler = handler();
        assert_eq!(handler.arg_duration(&Value::Null), 300);
        assert_eq!(handler.arg_duration(&json!({"durationMs": 150})), 150);
        assert_eq!(handler.arg_duration(&json!({"durationMs": -5})), 0);
    }

    #[test]
    fn request_round_trips_through_json() {
        let parsed: CommandRequest =
            serde_json::from_str(r#"{"method":"performTap","args":{"x":1,"y":2}}"#).unwrap();
        assert_eq!(parsed.method, "performTap");
        assert_eq!(arg_i32(&parsed.args, "y"), 2);

        let no_args: CommandRequest =
            serde_json::from_str(r#"{"method":"isServiceEnabled"}"#).unwrap();
        assert_eq!(no_args.args, Value::Null);
    }
}
