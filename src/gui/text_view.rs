// ── Word-wrapping text view ───────────────────────────────────────────────────
//
// Append-only display buffer, no cursor, no selection.  Layout is a greedy
// word wrap recomputed from scratch on every draw call, which is the natural
// cost model for an immediate-mode widget.  Text that overflows the bottom is
// silently swallowed by the clip rectangle; there is no scrollback.

use crate::gui::chrome::draw_sunken_box;
use crate::gui::style::Style;
use crate::gui::surface::{Rect, Surface};

/// Maximum number of characters held.  Appends beyond this are dropped.
pub(crate) const TEXT_VIEW_CAPACITY: usize = 94_999;

#[derive(Clone, Debug)]
pub(crate) struct TextView {
    text: String,
}

impl TextView {
    pub(crate) fn new() -> Self {
        TextView {
            text: String::new(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Append as much of `text` as fits in the remaining capacity.  Excess is
    /// dropped silently, never splitting a character.
    pub(crate) fn append(&mut self, text: &str) {
        let space = TEXT_VIEW_CAPACITY.saturating_sub(self.text.len());
        if text.len() <= space {
            self.text.push_str(text);
            return;
        }
        let mut end = space;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        self.text.push_str(&text[..end]);
    }

    /// Draw-only frame entry point: chrome, then the wrapped text.
    pub(crate) fn update(&mut self, surface: &mut dyn Surface, style: &Style, rect: Rect) {
        draw_sunken_box(surface, style, rect);
        let interior = rect.inset(style.scaled(4.0), style.scaled(2.0));
        surface.set_clip(interior);

        let line_height = surface.line_height();
        let space_width = surface.text_width(" ");
        let right_edge = interior.right();
        let bytes = self.text.as_bytes();

        let mut x = interior.x;
        let mut y = interior.y;
        let mut i = 0;
        while i < bytes.len() {
            let word_end = next_break(bytes, i);
            let word = &self.text[i..word_end];
            let word_width = surface.text_width(word);
            let delimiter = bytes.get(word_end).copied();

            // Wrap before drawing, unless an explicit newline will break the
            // line anyway.
            if delimiter != Some(b'\n') && x + word_width >= right_edge {
                x = interior.x;
                y += line_height;
            }

            surface.draw_text(x, y, style.text, word);
            x += word_width + space_width;

            if delimiter == Some(b'\n') {
                x = interior.x;
                y += line_height;
            }

            i = word_end + 1; // step over the delimiter
        }

        surface.clear_clip();
    }
}

/// Index of the next space or newline at or after `start`, or the buffer end.
fn next_break(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b' ' || b == b'\n')
        .map_or(bytes.len(), |p| start + p)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
