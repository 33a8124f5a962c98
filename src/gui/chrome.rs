// ── Sunken-box chrome ─────────────────────────────────────────────────────────
//
// The recessed two-tone frame drawn as the background of every widget.
// Pure function of its inputs; holds no state.

use crate::gui::style::Style;
use crate::gui::surface::{Rect, Surface};

/// Draw a sunken panel filling `rect` (external size).
///
/// ```text
///        <-------- w -------->
///     ^  1 1 1 1 1 1 1 1 1 1 1  ^
///     |  1 1 1 1 1 1 1 1 1 1 1  | thickness
///     |  1 1 1 1 1 1 1 1 1 1 1  v
///     |  3 3 3           4 4 4
///   h |  3 3 3           4 4 4
///     |  3 3 3           4 4 4
///     |  2 2 2 2 2 2 2 2 2 2 2
///     |  2 2 2 2 2 2 2 2 2 2 2
///     v  2 2 2 2 2 2 2 2 2 2 2
///       <--->
///     thickness
/// ```
///
/// Edges 1 and 3 use the shadow bevel color and edges 2 and 4 the highlight,
/// which is what makes the panel read as recessed.  The interior is filled
/// with the background color.  Degenerate sizes fall through to the
/// surface's no-op fill handling.
pub(crate) fn draw_sunken_box(surface: &mut dyn Surface, style: &Style, rect: Rect) {
    let t = style.scaled(1.5);
    let Rect { x, y, w, h } = rect;

    surface.fill_rect(Rect::new(x, y, w, t), style.bevel_shadow); // '1' pixels
    surface.fill_rect(Rect::new(x, y + h - t, w, t), style.bevel_highlight); // '2' pixels
    surface.fill_rect(Rect::new(x, y + t, t, h - 2 * t), style.bevel_shadow); // '3' pixels
    surface.fill_rect(Rect::new(x + w - t, y + t, t, h - 2 * t), style.bevel_highlight); // '4'

    surface.fill_rect(rect.inset(t, t), style.background);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
