//! Win32 input injection via `SendInput`

use crate::command::{Point, StrokePath};
use crate::engine::StrokeInjector;
use crate::{DispatchError, DispatchResult};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MOVE, MOUSEINPUT, MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

/// Interval between interpolated move events while animating a stroke.
const STEP_MS: u64 = 8;

/// Injects strokes as absolute left-button mouse events.
///
/// The press at the stroke's first point is submitted synchronously and its
/// verdict returned; the motion and release are animated on a detached
/// thread over the stroke's duration, so the call never blocks on the
/// gesture itself.
#[derive(Debug, Default)]
pub struct Win32Injector;

impl Win32Injector {
    pub fn new() -> Self {
        Self
    }
}

impl StrokeInjector for Win32Injector {
    fn inject_stroke(&self, stroke: &StrokePath) -> DispatchResult<()> {
        if stroke.start_delay_ms > 0 {
            thread::sleep(Duration::from_millis(stroke.start_delay_ms));
        }

        let start = stroke.start();
        let end = stroke.end();
        let duration_ms = stroke.duration_ms;

        // Move to the start point and press. A rejected press means the
        // whole stroke is rejected; nothing to clean up yet.
        send_batch(&[
            mouse_move(start),
            mouse_button(MOUSEEVENTF_LEFTDOWN),
        ])?;

        debug!(?start, ?end, duration_ms, "stroke press accepted, animating");

        // Fire-and-forget: the remainder of the stroke runs unobserved.
        thread::spawn(move || {
            let steps = (duration_ms / STEP_MS).max(1);
            for i in 1..=steps {
                thread::sleep(Duration::from_millis((duration_ms / steps).max(1)));
                let t = i as f64 / steps as f64;
                let x = start.x + ((end.x - start.x) as f64 * t).round() as i32;
                let y = start.y + ((end.y - start.y) as f64 * t).round() as i32;
                if send_batch(&[mouse_move(Point::new(x, y))]).is_err() {
                    warn!("stroke move dropped mid-animation");
                }
            }
            if send_batch(&[mouse_button(MOUSEEVENTF_LEFTUP)]).is_err() {
                warn!("stroke release dropped");
            }
        });

        Ok(())
    }
}

fn send_batch(inputs: &[INPUT]) -> DispatchResult<()> {
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(DispatchError::InjectionRejected(
            "SendInput did not accept all events".into(),
        ));
    }
    Ok(())
}

/// Absolute move event; coordinates normalized to the 0..65535 range the
/// absolute mouse protocol expects.
fn mouse_move(point: Point) -> INPUT {
    let (width, height) = unsafe {
        (
            GetSystemMetrics(SM_CXSCREEN).max(2),
            GetSystemMetrics(SM_CYSCREEN).max(2),
        )
    };
    let dx = point.x as i64 * 65535 / (width as i64 - 1);
    let dy = point.y as i64 * 65535 / (height as i64 - 1);
    mouse_input(dx as i32, dy as i32, MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE)
}

fn mouse_button(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    mouse_input(0, 0, flags)
}

fn mouse_input(dx: i32, dy: i32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}
