// ── Shared widget style ───────────────────────────────────────────────────────
//
// One `Style` is owned by the `App` and passed by reference into every widget
// call.  The only writer is `handle_zoom`, invoked at the top of the frame;
// everything downstream reads it.

use crate::gui::input::{InputSnapshot, Key};
use crate::gui::surface::Color;

/// Colors and the display scale factor shared by all widgets.
#[derive(Clone, Debug)]
pub(crate) struct Style {
    pub(crate) background: Color,
    pub(crate) frame: Color,
    /// Bevel color for the top/left edges of sunken chrome.
    pub(crate) bevel_shadow: Color,
    /// Bevel color for the bottom/right edges of sunken chrome.
    pub(crate) bevel_highlight: Color,
    pub(crate) text: Color,
    pub(crate) selection: Color,
    /// Display scale applied to every widget metric, in
    /// [`Style::MIN_SCALE`, `Style::MAX_SCALE`].
    pub(crate) draw_scale: f64,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            background: Color(0x494949),
            frame: Color(0x555555),
            bevel_shadow: Color(0x323232),
            bevel_highlight: Color(0x6F6F6F),
            text: Color::rgb(210, 210, 210),
            selection: Color::rgb(21, 79, 255),
            draw_scale: 1.0,
        }
    }
}

impl Style {
    pub(crate) const MIN_SCALE: f64 = 0.7;
    pub(crate) const MAX_SCALE: f64 = 3.0;

    /// Multiplicative zoom step applied per key-down edge.
    const ZOOM_STEP: f64 = 1.1;

    /// Unscaled text height the font table is matched against.
    pub(crate) const BASE_TEXT_HEIGHT: f64 = 13.0;

    /// Scale a metric defined at 1.0 to the current draw scale.
    pub(crate) fn scaled(&self, px: f64) -> i32 {
        (px * self.draw_scale).round() as i32
    }

    /// The font pixel height the current scale asks for.  The platform layer
    /// picks the nearest entry of its discrete font table.
    pub(crate) fn desired_text_height(&self) -> f64 {
        Self::BASE_TEXT_HEIGHT * self.draw_scale
    }

    /// Apply the Ctrl + `+`/`-` zoom gesture.  Returns `true` when the scale
    /// changed, which is the caller's cue to re-select the font.
    pub(crate) fn handle_zoom(&mut self, input: &InputSnapshot) -> bool {
        if !input.is_held(Key::Control) {
            return false;
        }

        let changed = if input.was_pressed(Key::Plus) {
            self.draw_scale *= Self::ZOOM_STEP;
            true
        } else if input.was_pressed(Key::Minus) {
            self.draw_scale /= Self::ZOOM_STEP;
            true
        } else {
            false
        };

        if changed {
            self.draw_scale = self.draw_scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        }
        changed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
