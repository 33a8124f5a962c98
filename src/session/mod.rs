// ── Session persistence ───────────────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\Bloatview\session.json`: the last draw scale
// and window placement.  Widget state is never persisted.
// No `unsafe` — pure safe Rust + serde_json.

use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::gui::style::Style;

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON session file.
#[derive(Serialize, Deserialize)]
pub(crate) struct SessionFile {
    pub(crate) version: u32,
    /// Last display scale.  Re-clamped on load; hand-edited files cannot
    /// push widgets outside the supported range.
    pub(crate) draw_scale: f64,
    /// Last window placement in screen pixels, or `None` to let Windows pick.
    #[serde(default)] // backward-compat: old files without this field parse as None
    pub(crate) window: Option<WindowPlacement>,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
pub(crate) struct WindowPlacement {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

// ── Format version ────────────────────────────────────────────────────────────

const SESSION_VERSION: u32 = 1;

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the session file: `%APPDATA%\Bloatview\session.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
pub(crate) fn session_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("Bloatview");
    p.push("session.json");
    Some(p)
}

// ── Save ──────────────────────────────────────────────────────────────────────

/// Write the session to `%APPDATA%\Bloatview\session.json`.
///
/// Creates the `Bloatview` directory if it does not exist.
/// The caller (`window.rs`) silently discards any returned error.
pub(crate) fn save(draw_scale: f64, window: Option<WindowPlacement>) -> io::Result<()> {
    let path =
        session_path().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA not set"))?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let sf = SessionFile {
        version: SESSION_VERSION,
        draw_scale,
        window,
    };

    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, &sf).map_err(io::Error::other)
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Read and parse the session file.
///
/// Returns `None` on any error: file missing, JSON parse failure, or an
/// unrecognised version number.  The app continues with defaults.
pub(crate) fn load() -> Option<SessionFile> {
    let path = session_path()?;
    let data = fs::read(&path).ok()?;
    let mut sf: SessionFile = serde_json::from_slice(&data).ok()?;
    if sf.version != SESSION_VERSION {
        return None;
    }
    sf.draw_scale = sf.draw_scale.clamp(Style::MIN_SCALE, Style::MAX_SCALE);
    Some(sf)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_with_placement() {
        let sf = SessionFile {
            version: SESSION_VERSION,
            draw_scale: 1.3,
            window: Some(WindowPlacement {
                x: 40,
                y: 60,
                w: 800,
                h: 600,
            }),
        };
        let json = serde_json::to_string(&sf).expect("serialize");
        let sf2: SessionFile = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(sf2.version, SESSION_VERSION);
        assert_eq!(sf2.draw_scale, 1.3);
        let wp = sf2.window.expect("placement");
        assert_eq!((wp.x, wp.y, wp.w, wp.h), (40, 60, 800, 600));
    }

    /// Old session files written before window placement was recorded have
    /// no `window` field.  `#[serde(default)]` must make them parse as
    /// `None`.
    #[test]
    fn placement_defaults_to_none_when_absent() {
        let json = r#"{"version":1,"draw_scale":1.0}"#;
        let sf: SessionFile = serde_json::from_str(json).expect("deserialize old format");
        assert!(sf.window.is_none());
    }

    /// A session file with an unrecognised version number must be rejected
    /// by `load()`.  Test the parse-and-check logic directly.
    #[test]
    fn wrong_version_is_rejected() {
        let sf = SessionFile {
            version: 99,
            draw_scale: 1.0,
            window: None,
        };
        let json = serde_json::to_string(&sf).expect("serialize");
        let parsed: SessionFile = serde_json::from_str(&json).expect("deserialize");
        // load() would return None for this version; assert the condition directly.
        assert_ne!(parsed.version, SESSION_VERSION);
    }

    /// Hand-edited scales outside [0.7, 3.0] must clamp, the same way
    /// `load()` does before handing the value to the app.
    #[test]
    fn out_of_range_scale_clamps() {
        let clamped = 9.5_f64.clamp(Style::MIN_SCALE, Style::MAX_SCALE);
        assert_eq!(clamped, Style::MAX_SCALE);
        let clamped = 0.01_f64.clamp(Style::MIN_SCALE, Style::MAX_SCALE);
        assert_eq!(clamped, Style::MIN_SCALE);
    }
}
