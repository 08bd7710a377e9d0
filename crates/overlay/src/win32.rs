//! Win32 overlay surface backend
//!
//! A layered, topmost, click-through popup window with a color-keyed ring
//! glyph. All pointer input passes through to the application beneath.
//!
//! Each surface lives on its own thread, which owns the window and pumps
//! its message queue so queued paints are actually processed; relayout and
//! destruction are marshalled to that thread as posted messages, so the
//! command thread never blocks on the window.

use crate::surface::{SurfaceHandle, SurfaceHost, SurfaceSpec};
use crate::{OverlayError, OverlayResult};
use once_cell::sync::OnceCell;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tracing::warn;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreatePen, DeleteObject, Ellipse, EndPaint, FillRect, GetStockObject,
    SelectObject, BLACK_BRUSH, HBRUSH, NULL_BRUSH, PAINTSTRUCT, PS_SOLID,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClientRect, GetMessageW,
    PostMessageW, PostQuitMessage, RegisterClassExW, SetLayeredWindowAttributes, SetWindowPos,
    ShowWindow, TranslateMessage, CS_HREDRAW, CS_VREDRAW, HWND_TOPMOST, LWA_COLORKEY, MSG,
    SWP_NOACTIVATE, SWP_NOSIZE, SW_SHOWNOACTIVATE, WM_APP, WM_CLOSE, WM_DESTROY, WM_PAINT,
    WNDCLASSEXW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_EX_TRANSPARENT, WS_POPUP,
};

const CLASS_NAME: PCWSTR = w!("TapBridgeCursorOverlay");

/// Re-anchor request posted from the command thread; x rides in wparam,
/// y in lparam.
const WM_SURFACE_MOVE: u32 = WM_APP + 1;

/// Glyph ring color, 0x00BBGGRR.
const GLYPH_COLOR: COLORREF = COLORREF(0x00cc66ff);
const GLYPH_THICKNESS: i32 = 4;

/// Everything painted in the key color is rendered fully transparent, so
/// only the ring itself is visible on screen.
const KEY_COLOR: COLORREF = COLORREF(0);

static WINDOW_CLASS: OnceCell<()> = OnceCell::new();

/// Creates cursor-glyph overlay windows, one message-pumping thread each.
#[derive(Debug, Default)]
pub struct Win32SurfaceHost;

impl Win32SurfaceHost {
    pub fn new() -> Self {
        Self
    }
}

struct Win32Surface {
    /// Raw handle; the HWND itself stays with the window thread.
    hwnd: isize,
    thread: Option<JoinHandle<()>>,
    anchor: (i32, i32),
}

impl Win32Surface {
    fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut std::ffi::c_void)
    }
}

impl SurfaceHandle for Win32Surface {
    fn move_to(&mut self, anchor_x: i32, anchor_y: i32) {
        self.anchor = (anchor_x, anchor_y);
        let posted = unsafe {
            PostMessageW(
                self.hwnd(),
                WM_SURFACE_MOVE,
                WPARAM(anchor_x as u32 as usize),
                LPARAM(anchor_y as isize),
            )
        };
        if posted.is_err() {
            warn!(anchor_x, anchor_y, "overlay relayout message dropped");
        }
    }

    fn anchor(&self) -> (i32, i32) {
        self.anchor
    }
}

impl Drop for Win32Surface {
    fn drop(&mut self) {
        unsafe {
            let _ = PostMessageW(self.hwnd(), WM_CLOSE, WPARAM(0), LPARAM(0));
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl SurfaceHost for Win32SurfaceHost {
    fn create(&self, spec: &SurfaceSpec) -> OverlayResult<Box<dyn SurfaceHandle>> {
        let spec = *spec;
        let (ready_tx, ready_rx) = mpsc::channel();
        let thread = thread::spawn(move || surface_thread(spec, ready_tx));

        // Creation is synchronous from the caller's point of view: a failed
        // window (typically missing overlay permission) surfaces here and
        // the short-lived thread is already gone.
        let hwnd = ready_rx
            .recv()
            .map_err(|_| OverlayError::Unavailable("overlay thread died before creating its window".into()))?
            .map_err(OverlayError::Unavailable)?;

        Ok(Box::new(Win32Surface {
            hwnd,
            thread: Some(thread),
            anchor: (spec.anchor_x, spec.anchor_y),
        }))
    }
}

/// Owns the window for its whole life: create, pump messages, exit after
/// `WM_DESTROY` stops the loop.
fn surface_thread(spec: SurfaceSpec, ready: mpsc::Sender<Result<isize, String>>) {
    unsafe {
        let hmodule = match GetModuleHandleW(None) {
            Ok(hmodule) => hmodule,
            Err(err) => {
                let _ = ready.send(Err(err.to_string()));
                return;
            }
        };
        let hinstance = HINSTANCE(hmodule.0);

        ensure_window_class(hinstance);

        let mut ex_style = WS_EX_LAYERED | WS_EX_TOOLWINDOW;
        if spec.always_on_top {
            ex_style |= WS_EX_TOPMOST;
        }
        if !spec.focusable {
            ex_style |= WS_EX_NOACTIVATE;
        }
        if spec.touch_transparent {
            ex_style |= WS_EX_TRANSPARENT;
        }

        let hwnd = match CreateWindowExW(
            ex_style,
            CLASS_NAME,
            PCWSTR::null(),
            WS_POPUP,
            spec.anchor_x,
            spec.anchor_y,
            spec.width,
            spec.height,
            None,
            None,
            hinstance,
            None,
        ) {
            Ok(hwnd) => hwnd,
            Err(err) => {
                let _ = ready.send(Err(err.to_string()));
                return;
            }
        };

        let _ = SetLayeredWindowAttributes(hwnd, KEY_COLOR, 0, LWA_COLORKEY);
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);

        let _ = ready.send(Ok(hwnd.0 as isize));

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

fn ensure_window_class(hinstance: HINSTANCE) {
    WINDOW_CLASS.get_or_init(|| unsafe {
        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };
        RegisterClassExW(&wc);
    });
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            let mut paint = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut paint);

            let mut rect = RECT::default();
            let _ = GetClientRect(hwnd, &mut rect);

            // Key-colored background so everything but the ring is
            // see-through.
            FillRect(hdc, &rect, HBRUSH(GetStockObject(BLACK_BRUSH).0));

            let pen = CreatePen(PS_SOLID, GLYPH_THICKNESS, GLYPH_COLOR);
            let old_pen = SelectObject(hdc, pen);
            let old_brush = SelectObject(hdc, GetStockObject(NULL_BRUSH));

            let inset = GLYPH_THICKNESS / 2 + 1;
            let _ = Ellipse(
                hdc,
                rect.left + inset,
                rect.top + inset,
                rect.right - inset,
                rect.bottom - inset,
            );

            SelectObject(hdc, old_brush);
            SelectObject(hdc, old_pen);
            let _ = DeleteObject(pen);

            let _ = EndPaint(hwnd, &paint);
            LRESULT(0)
        }

        WM_SURFACE_MOVE => {
            let anchor_x = wparam.0 as u32 as i32;
            let anchor_y = lparam.0 as i32;
            if SetWindowPos(
                hwnd,
                HWND_TOPMOST,
                anchor_x,
                anchor_y,
                0,
                0,
                SWP_NOSIZE | SWP_NOACTIVATE,
            )
            .is_err()
            {
                warn!(anchor_x, anchor_y, "overlay relayout failed");
            }
            LRESULT(0)
        }

        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
