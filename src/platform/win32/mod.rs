// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the one module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod dialogs; // dump-file picker
pub mod window; // main window, WndProc, frame pump

pub(crate) mod dpi; // per-monitor DPI v2 helpers; seeds the initial draw scale
pub(crate) mod surface; // GDI backbuffer implementing gui::Surface
