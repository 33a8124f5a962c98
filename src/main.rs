// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – Win32 / WinAPI FFI
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that eprintln! timing output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod error;
mod gui;
mod pdb;
mod platform;
mod session;

use std::path::PathBuf;

use windows::Win32::Foundation::HWND;

fn main() {
    if let Err(e) = run() {
        // Startup failed before or during the message loop.
        // Show a modal error dialog — the only safe output path in a GUI app.
        platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

fn run() -> error::Result<()> {
    // Must precede all window creation, including the open dialog.
    platform::win32::dpi::init();

    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    let session = session::load();
    let draw_scale = session
        .as_ref()
        .map_or_else(platform::win32::dpi::initial_scale, |s| s.draw_scale);

    // Dump file: first CLI argument, or ask.  A cancelled dialog is a normal
    // exit, not an error.
    let Some(path) = dump_path() else {
        return Ok(());
    };

    // Dumps from old toolchains are not reliably UTF-8; parse them lossily
    // rather than refusing the file.
    let bytes = std::fs::read(&path)?;
    let text = String::from_utf8_lossy(&bytes);
    let summary = pdb::parse_dump(&text)?;

    #[cfg(debug_assertions)]
    eprintln!(
        "[bloatview] parsed {} modules ({} functions, {} code bytes) in {:.1} ms",
        summary.modules.len(),
        summary.total_functions,
        summary.total_code_bytes,
        t0.elapsed().as_secs_f64() * 1000.0
    );

    let app = app::App::new(summary, draw_scale);
    platform::win32::window::run(app, session.and_then(|s| s.window))
}

/// The dump file to open: `bloatview <file>` or the standard Open dialog.
fn dump_path() -> Option<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Some(PathBuf::from(arg));
    }
    platform::win32::dialogs::show_open_dialog(HWND::default())
}
