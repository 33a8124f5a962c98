// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class.
//   • Create the top-level window, restoring any saved placement.
//   • Run the Win32 message loop.
//   • Coalesce input messages into the per-frame `InputSnapshot`.
//   • Drive one `App` frame per WM_PAINT and blit the backbuffer.
//   • Keep blink timers live with a 200 ms forced-refresh timer.
//   • Expose a safe error-dialog helper for use by main().

#![allow(unsafe_code)]

use std::time::Instant;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{BeginPaint, EndPaint, InvalidateRect, HBRUSH, PAINTSTRUCT},
        System::LibraryLoader::GetModuleHandleW,
        UI::Input::KeyboardAndMouse::{
            VIRTUAL_KEY, VK_ADD, VK_CONTROL, VK_DELETE, VK_DOWN, VK_END, VK_ESCAPE, VK_HOME,
            VK_LEFT, VK_NEXT, VK_OEM_MINUS, VK_OEM_PLUS, VK_PRIOR, VK_RIGHT, VK_SUBTRACT,
            VK_UP,
        },
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClientRect,
            GetMessage, GetWindowLongPtrW, GetWindowRect, KillTimer, LoadCursorW, LoadIconW,
            MessageBoxW, PostQuitMessage, RegisterClassExW, SetTimer, SetWindowLongPtrW,
            ShowWindow, TranslateMessage, UpdateWindow, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT,
            GWLP_USERDATA, HMENU, IDC_ARROW, IDI_APPLICATION, MB_ICONERROR, MB_OK,
            MSG, SW_SHOW, WINDOW_EX_STYLE, WM_CHAR, WM_CLOSE, WM_DESTROY, WM_KEYDOWN,
            WM_KEYUP, WM_LBUTTONDOWN, WM_MOUSEMOVE, WM_MOUSEWHEEL, WM_NCDESTROY, WM_PAINT,
            WM_SIZE, WM_TIMER, WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
        },
    },
};

use crate::app::App;
use crate::error::{BloatviewError, Result};
use crate::gui::input::{InputSnapshot, Key};
use crate::platform::win32::surface::GdiSurface;
use crate::session::{self, WindowPlacement};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the main window class.
const CLASS_NAME: PCWSTR = w!("BloatviewMainWindow");

/// Title bar text.
const APP_TITLE: PCWSTR = w!("Bloatview");

/// Default client width in device pixels when no session placement exists.
const DEFAULT_WIDTH: i32 = 960;

/// Default client height in device pixels.
const DEFAULT_HEIGHT: i32 = 640;

// ── Frame pacing ──────────────────────────────────────────────────────────────

/// Forced-refresh timer: repaint every 200 ms even without input, so blink
/// timers and other time-based state stay live.
const REFRESH_TIMER_ID: usize = 1;
const REFRESH_INTERVAL_MS: u32 = 200;

// ── Window state ──────────────────────────────────────────────────────────────

/// Everything WndProc needs, attached to the window via `GWLP_USERDATA`.
struct WindowState {
    app: App,
    /// Created lazily on the first WM_PAINT (a paint DC is needed).
    surface: Option<GdiSurface>,
    input: InputSnapshot,
    started: Instant,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Register the main window class, create the window, and drive the message
/// loop until the user closes the application.
///
/// Records a startup timestamp and logs elapsed time (debug builds only) once
/// the window is first shown on screen.
pub(crate) fn run(app: App, placement: Option<WindowPlacement>) -> Result<()> {
    // Startup benchmark harness — only compiled in debug builds so the
    // variable is never unused in release mode.
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(BloatviewError::from)?;

    // HINSTANCE and HMODULE represent the same underlying value on Windows
    // (guaranteed by the Win32 ABI).
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;
    let hwnd = create_window(hinstance, placement)?;

    let state = Box::new(WindowState {
        app,
        surface: None,
        input: InputSnapshot::default(),
        started: Instant::now(),
    });
    // SAFETY: hwnd was just created on this thread.  The raw pointer is
    // owned by the window from here on and reclaimed exactly once, in the
    // WM_NCDESTROY handler.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);
    }

    // SAFETY: hwnd is valid; SetTimer with a null callback posts WM_TIMER to
    // the window's own queue.  ShowWindow returns the previous visibility
    // state and UpdateWindow a success BOOL — both intentionally ignored.
    unsafe {
        SetTimer(hwnd, REFRESH_TIMER_ID, REFRESH_INTERVAL_MS, None);
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }

    // Startup milestone — window is now visible on screen.
    #[cfg(debug_assertions)]
    eprintln!(
        "[bloatview] window visible in {:.1} ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );

    message_loop()
}

/// Show a modal error dialog with the given message.
///
/// Safe to call from any context; performs the UTF-16 conversion internally.
/// Used by `main()` when `run()` returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide: Vec<u16> = message.encode_utf16().chain(std::iter::once(0)).collect();
    let title_wide: Vec<u16> = "Bloatview — Fatal Error"
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: msg_wide and title_wide are valid null-terminated UTF-16 strings
    // that remain allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    // Return value (button pressed) is intentionally unused for an error dialog.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(BloatviewError::from)?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(BloatviewError::from)?;

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // CS_HREDRAW | CS_VREDRAW: repaint on resize.
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        // No class background brush: every frame repaints the whole client
        // area from the backbuffer, and an erase pass would only flicker.
        hbrBackground: HBRUSH::default(),
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(hinstance: HINSTANCE, placement: Option<WindowPlacement>) -> Result<HWND> {
    let (x, y, w, h) = match placement {
        Some(p) => (p.x, p.y, p.w, p.h),
        None => (CW_USEDEFAULT, CW_USEDEFAULT, DEFAULT_WIDTH, DEFAULT_HEIGHT),
    };

    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    // HWND::default() (null parent) creates a top-level window.
    // HMENU::default() (null menu) — Bloatview has no menu bar.
    // None for lpParam: state is attached after creation instead.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            APP_TITLE,
            WS_OVERLAPPEDWINDOW,
            x,
            y,
            w,
            h,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    };

    if hwnd == HWND::default() {
        return Err(last_error("CreateWindowExW"));
    }

    Ok(hwnd)
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop() -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessage(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            // GetMessage returns -1 on error.
            -1 => return Err(last_error("GetMessage")),
            // Returns 0 when WM_QUIT is retrieved — exit the loop cleanly.
            0 => break,
            // Any other value: a normal message to dispatch.
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessage call.
                // TranslateMessage return value (whether it generated WM_CHAR)
                // and DispatchMessageW's LRESULT are intentionally unused.
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }
    }

    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

/// Retrieve the state attached in `run()`.
///
/// SAFETY: caller must be on the window's thread and must not call this in
/// WM_NCDESTROY, where the pointer is being reclaimed.
unsafe fn state_mut<'a>(hwnd: HWND) -> Option<&'a mut WindowState> {
    let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowState;
    ptr.as_mut()
}

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // ── Input collection ──────────────────────────────────────────────────
        WM_KEYDOWN => {
            if let Some(state) = state_mut(hwnd) {
                let vk = VIRTUAL_KEY(wparam.0 as u16);
                if vk == VK_ESCAPE {
                    // SAFETY: hwnd is the window being closed; same teardown
                    // path as WM_CLOSE below.
                    let _ = DestroyWindow(hwnd);
                    return LRESULT(0);
                }
                if vk == VK_DELETE {
                    // Delete produces no WM_CHAR; route it through the typed
                    // queue as 0x7F, where the edit box expects it.
                    state.input.typed.push('\u{7f}');
                }
                if let Some(key) = translate_key(vk) {
                    state.input.press(key);
                }
                request_frame(hwnd);
            }
            LRESULT(0)
        }

        WM_KEYUP => {
            if let Some(state) = state_mut(hwnd) {
                if let Some(key) = translate_key(VIRTUAL_KEY(wparam.0 as u16)) {
                    state.input.release(key);
                }
            }
            LRESULT(0)
        }

        WM_CHAR => {
            if let Some(state) = state_mut(hwnd) {
                if let Some(c) = char::from_u32(wparam.0 as u32) {
                    // Printable ASCII plus backspace; Ctrl combinations
                    // arrive as control codes and are dropped here.
                    if c == '\u{8}' || (' '..='\u{7e}').contains(&c) {
                        state.input.typed.push(c);
                        request_frame(hwnd);
                    }
                }
            }
            LRESULT(0)
        }

        WM_MOUSEMOVE => {
            if let Some(state) = state_mut(hwnd) {
                state.input.mouse_x = (lparam.0 & 0xFFFF) as i16 as i32;
                state.input.mouse_y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
            }
            LRESULT(0)
        }

        WM_LBUTTONDOWN => {
            if let Some(state) = state_mut(hwnd) {
                state.input.mouse_x = (lparam.0 & 0xFFFF) as i16 as i32;
                state.input.mouse_y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
                state.input.clicked = true;
                request_frame(hwnd);
            }
            LRESULT(0)
        }

        WM_MOUSEWHEEL => {
            if let Some(state) = state_mut(hwnd) {
                // High word of WPARAM is the signed wheel delta (120/notch).
                state.input.wheel_delta += (wparam.0 >> 16) as u16 as i16 as i32;
                request_frame(hwnd);
            }
            LRESULT(0)
        }

        // ── Frame pacing ──────────────────────────────────────────────────────
        WM_TIMER => {
            if wparam.0 == REFRESH_TIMER_ID {
                request_frame(hwnd);
            }
            LRESULT(0)
        }

        WM_SIZE => {
            request_frame(hwnd);
            LRESULT(0)
        }

        WM_PAINT => {
            if let Some(state) = state_mut(hwnd) {
                paint(hwnd, state);
            } else {
                // No state yet: validate the paint region anyway.
                let mut ps = PAINTSTRUCT::default();
                // SAFETY: hwnd is valid; BeginPaint/EndPaint bracket the DC.
                let _ = BeginPaint(hwnd, &mut ps);
                let _ = EndPaint(hwnd, &ps);
            }
            LRESULT(0)
        }

        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CLOSE => {
            if let Some(state) = state_mut(hwnd) {
                save_session(hwnd, state);
            }
            // SAFETY: hwnd is the window being closed; DestroyWindow triggers
            // WM_DESTROY, which posts WM_QUIT via PostQuitMessage.
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            // SAFETY: hwnd is still valid during WM_DESTROY; PostQuitMessage
            // with exit code 0 posts WM_QUIT to the thread's message queue.
            let _ = KillTimer(hwnd, REFRESH_TIMER_ID);
            PostQuitMessage(0);
            LRESULT(0)
        }

        WM_NCDESTROY => {
            // SAFETY: this is the last message the window receives; the
            // pointer was produced by Box::into_raw in run() and is reclaimed
            // exactly once here.  No `state_mut` borrow exists in this arm.
            let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut WindowState;
            if !ptr.is_null() {
                drop(Box::from_raw(ptr));
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // Default processing for all unhandled messages.
        // SAFETY: hwnd and message parameters are valid — provided by Windows.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Frame driving ─────────────────────────────────────────────────────────────

/// Ask for a repaint without erasing: the next WM_PAINT redraws everything
/// from the backbuffer.
fn request_frame(hwnd: HWND) {
    // SAFETY: hwnd is a valid window handle provided by WndProc.
    unsafe {
        let _ = InvalidateRect(hwnd, None, false.into());
    }
}

/// Run one app frame into the backbuffer and blit it.
///
/// SAFETY: caller is the WM_PAINT handler on the window's thread.
unsafe fn paint(hwnd: HWND, state: &mut WindowState) {
    let mut ps = PAINTSTRUCT::default();
    // SAFETY: hwnd is valid; the DC returned by BeginPaint stays usable until
    // the matching EndPaint below.
    let hdc = BeginPaint(hwnd, &mut ps);

    let mut client = RECT::default();
    // SAFETY: hwnd is valid and `client` is a live out-pointer.
    let _ = GetClientRect(hwnd, &mut client);
    let w = client.right - client.left;
    let h = client.bottom - client.top;

    if state.surface.is_none() {
        state.surface = GdiSurface::new(hdc, w, h, state.app.style.desired_text_height()).ok();
    }

    if let Some(surface) = state.surface.as_mut() {
        if surface.size() != (w.max(1), h.max(1)) {
            // A failed resize keeps the old backbuffer; draw at the stale
            // size rather than dropping the frame.
            let _ = surface.resize(hdc, w, h);
        }

        state.input.time = state.started.elapsed().as_secs_f64();
        let scale_changed = state.app.frame(&state.input, surface, w, h);
        surface.present(hdc);

        if scale_changed {
            // The new font takes effect on the next frame, which is requested
            // immediately.
            let _ = surface.select_font(state.app.style.desired_text_height());
            request_frame(hwnd);
        }
    }

    state.input.end_frame();

    // SAFETY: ps was filled by the successful BeginPaint above.
    let _ = EndPaint(hwnd, &ps);
}

/// Persist draw scale and window placement.  Errors are deliberately
/// discarded: failing to save a session must never block shutdown.
fn save_session(hwnd: HWND, state: &WindowState) {
    let mut rect = RECT::default();
    // SAFETY: hwnd is valid and `rect` is a live out-pointer.
    let placement = unsafe { GetWindowRect(hwnd, &mut rect) }
        .ok()
        .map(|()| WindowPlacement {
            x: rect.left,
            y: rect.top,
            w: rect.right - rect.left,
            h: rect.bottom - rect.top,
        });
    let _ = session::save(state.app.style.draw_scale, placement);
}

// ── Key translation ───────────────────────────────────────────────────────────

/// Map the virtual keys the widgets care about; everything else is `None`.
fn translate_key(vk: VIRTUAL_KEY) -> Option<Key> {
    match vk {
        VK_LEFT => Some(Key::Left),
        VK_RIGHT => Some(Key::Right),
        VK_UP => Some(Key::Up),
        VK_DOWN => Some(Key::Down),
        VK_HOME => Some(Key::Home),
        VK_END => Some(Key::End),
        VK_PRIOR => Some(Key::PageUp),
        VK_NEXT => Some(Key::PageDown),
        VK_CONTROL => Some(Key::Control),
        VK_OEM_PLUS | VK_ADD => Some(Key::Plus),
        VK_OEM_MINUS | VK_SUBTRACT => Some(Key::Minus),
        _ => None,
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a
/// `BloatviewError`.
///
/// Call immediately after a Win32 function that signals failure — `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> BloatviewError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    BloatviewError::Win32 {
        function,
        code: code.0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_and_paging_keys_translate() {
        assert_eq!(translate_key(VK_LEFT), Some(Key::Left));
        assert_eq!(translate_key(VK_PRIOR), Some(Key::PageUp));
        assert_eq!(translate_key(VK_NEXT), Some(Key::PageDown));
    }

    #[test]
    fn both_plus_and_minus_variants_translate() {
        assert_eq!(translate_key(VK_OEM_PLUS), Some(Key::Plus));
        assert_eq!(translate_key(VK_ADD), Some(Key::Plus));
        assert_eq!(translate_key(VK_OEM_MINUS), Some(Key::Minus));
        assert_eq!(translate_key(VK_SUBTRACT), Some(Key::Minus));
    }

    #[test]
    fn unmapped_keys_are_none() {
        assert_eq!(translate_key(VIRTUAL_KEY(0x41)), None); // 'A' — typed path only
        assert_eq!(translate_key(VK_ESCAPE), None); // handled before translation
    }
}
