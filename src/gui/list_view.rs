// ── Scrolling list view ───────────────────────────────────────────────────────
//
// Selectable list of caller-owned rows with keyboard, wheel, and click
// navigation.  The widget holds only indices; the row strings are passed into
// every update call and never stored.

use crate::gui::chrome::draw_sunken_box;
use crate::gui::input::{InputSnapshot, Key};
use crate::gui::style::Style;
use crate::gui::surface::{Rect, Surface};

/// Divisor converting raw wheel units into rows.  One 120-unit notch scrolls
/// about three rows.
const WHEEL_DIVISOR: i32 = 36;

/// Bias subtracted from the row count so a partially clipped final row does
/// not count as visible.
const ROW_COUNT_BIAS: f64 = 0.9;

#[derive(Clone, Debug)]
pub(crate) struct ListView {
    /// Selected row, clamped every frame to `[0, item_count - 1]`, or -1
    /// when the list is empty.
    selected: i32,
    /// First row drawn, in `[0, max(0, item_count - visible_rows)]`.
    first_visible: i32,
}

impl ListView {
    pub(crate) fn new() -> Self {
        ListView {
            selected: 0,
            first_visible: 0,
        }
    }

    pub(crate) fn selected(&self) -> i32 {
        self.selected
    }

    /// Jump back to the top.  Used when the row set changes wholesale (e.g.
    /// the filter text changed) and stale indices would be meaningless.
    pub(crate) fn reset(&mut self) {
        self.selected = 0;
        self.first_visible = 0;
    }

    /// Run one frame against `items`.  Returns `Some(index)` when this
    /// frame's key or click input moved the (post-clamp) selection, `None`
    /// otherwise; the current selection stays readable via `selected()`.
    pub(crate) fn update(
        &mut self,
        input: &InputSnapshot,
        surface: &mut dyn Surface,
        style: &Style,
        rect: Rect,
        items: &[String],
    ) -> Option<usize> {
        draw_sunken_box(surface, style, rect);
        let interior = rect.inset(style.scaled(2.0), style.scaled(2.0));
        surface.set_clip(interior);

        let line_height = surface.line_height();
        let num_rows = (interior.h as f64 / line_height as f64 - ROW_COUNT_BIAS).round() as i32;
        let item_count = items.len() as i32;
        let previous = self.selected;

        // Down/Up drag the window along so the selection stays visible;
        // PageDown/PageUp move window and selection by the same page and may
        // leave them temporarily desynced.  Deliberate.
        if input.was_pressed(Key::Down) {
            self.selected += 1;
            self.first_visible = self.first_visible.max(self.selected - num_rows);
        } else if input.was_pressed(Key::Up) {
            self.selected -= 1;
            self.first_visible = self.first_visible.min(self.selected);
        } else if input.was_pressed(Key::PageDown) {
            self.selected += num_rows;
            self.first_visible += num_rows;
        } else if input.was_pressed(Key::PageUp) {
            self.selected -= num_rows;
            self.first_visible -= num_rows;
        }

        if input.clicked && interior.contains(input.mouse_x, input.mouse_y) {
            let row = (input.mouse_y - interior.y) / line_height;
            self.selected = row + self.first_visible;
        }

        // Selection clamp, applied every frame after input handling.
        if self.selected >= item_count || item_count <= 0 {
            self.selected = item_count - 1;
        } else if self.selected < 0 {
            self.selected = 0;
        }

        self.first_visible -= input.wheel_delta / WHEEL_DIVISOR;
        self.first_visible = self.first_visible.clamp(0, (item_count - num_rows).max(0));
        if item_count <= num_rows {
            self.first_visible = 0;
        }

        let last_y = interior.bottom();
        let mut y = interior.y;
        for i in self.first_visible..item_count {
            if y > last_y {
                break;
            }

            if i == self.selected {
                surface.fill_rect(
                    Rect::new(interior.x, y, interior.w, line_height),
                    style.selection,
                );
            }

            surface.draw_text(
                interior.x + style.scaled(2.0),
                y,
                style.text,
                &items[i as usize],
            );
            y += line_height;
        }

        surface.clear_clip();

        if self.selected != previous && self.selected >= 0 {
            Some(self.selected as usize)
        } else {
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
