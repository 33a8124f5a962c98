// ── Drawing surface contract ──────────────────────────────────────────────────
//
// The widget toolkit draws through this trait and never learns what is behind
// it.  The production implementation is a GDI DIB section in
// `platform::win32::surface`; tests use the recording surface at the bottom
// of this file.
//
// Font metrics travel through the same handle (`line_height`, `text_width`)
// so widget layout is decoupled from any particular font source.

// ── Color ─────────────────────────────────────────────────────────────────────

/// An opaque RGB color, `0x00RRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Color(pub(crate) u32);

impl Color {
    pub(crate) const BLACK: Color = Color(0x000000);

    pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub(crate) fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub(crate) fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub(crate) fn b(self) -> u8 {
        self.0 as u8
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle in surface pixels.
///
/// Half-open on both axes: a point is inside when `x <= px < x + w` and
/// `y <= py < y + h`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Rect {
    pub(crate) const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub(crate) fn right(self) -> i32 {
        self.x + self.w
    }

    pub(crate) fn bottom(self) -> i32 {
        self.y + self.h
    }

    pub(crate) fn contains(self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    pub(crate) fn inset(self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w - 2 * dx,
            h: self.h - 2 * dy,
        }
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

/// Everything a widget may do to the screen.
///
/// The clip rectangle is a scoped resource: a widget that calls `set_clip`
/// MUST call `clear_clip` before returning, on every exit path, or the clip
/// leaks onto whatever is drawn next.
pub(crate) trait Surface {
    /// Height in pixels of one line of text in the current font.
    fn line_height(&self) -> i32;

    /// Width in pixels that `text` occupies in the current font.
    fn text_width(&self, text: &str) -> i32;

    /// Fill `rect` with a solid color, honoring the current clip.
    /// Non-positive width or height is a degenerate no-op, not an error.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Suppress all drawing outside `rect` until `clear_clip` is called.
    fn set_clip(&mut self, rect: Rect);

    /// Remove the clip rectangle installed by `set_clip`.
    fn clear_clip(&mut self);

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: i32, y: i32, color: Color, text: &str);
}

// ── Recording surface (tests) ─────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testing {
    use super::{Color, Rect, Surface};

    /// One recorded drawing call.
    #[derive(Clone, PartialEq, Debug)]
    pub(crate) enum DrawOp {
        Fill { rect: Rect, color: Color },
        Text { x: i32, y: i32, text: String },
        Clip(Rect),
        ClearClip,
    }

    /// A surface with fixed glyph metrics (8 px advance, 13 px lines) that
    /// records every call instead of drawing.  Widget tests assert against
    /// the recorded op list.
    pub(crate) struct RecordingSurface {
        pub(crate) ops: Vec<DrawOp>,
        pub(crate) clip: Option<Rect>,
    }

    impl RecordingSurface {
        pub(crate) const CHAR_WIDTH: i32 = 8;
        pub(crate) const LINE_HEIGHT: i32 = 13;

        pub(crate) fn new() -> Self {
            RecordingSurface {
                ops: Vec::new(),
                clip: None,
            }
        }

        /// The recorded text draws, in call order.
        pub(crate) fn texts(&self) -> Vec<&DrawOp> {
            self.ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Text { .. }))
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn line_height(&self) -> i32 {
            Self::LINE_HEIGHT
        }

        fn text_width(&self, text: &str) -> i32 {
            text.len() as i32 * Self::CHAR_WIDTH
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            if rect.w <= 0 || rect.h <= 0 {
                return;
            }
            self.ops.push(DrawOp::Fill { rect, color });
        }

        fn set_clip(&mut self, rect: Rect) {
            self.clip = Some(rect);
            self.ops.push(DrawOp::Clip(rect));
        }

        fn clear_clip(&mut self) {
            self.clip = None;
            self.ops.push(DrawOp::ClearClip);
        }

        fn draw_text(&mut self, x: i32, y: i32, _color: Color, text: &str) {
            self.ops.push(DrawOp::Text {
                x,
                y,
                text: text.to_owned(),
            });
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(10, 10));
        assert!(r.contains(14, 14));
        assert!(!r.contains(15, 10));
        assert!(!r.contains(10, 15));
        assert!(!r.contains(9, 10));
    }

    #[test]
    fn rect_inset_shrinks_both_sides() {
        let r = Rect::new(0, 0, 100, 50).inset(2, 4);
        assert_eq!(r, Rect::new(2, 4, 96, 42));
    }

    #[test]
    fn color_channels() {
        let c = Color::rgb(210, 80, 3);
        assert_eq!(c.r(), 210);
        assert_eq!(c.g(), 80);
        assert_eq!(c.b(), 3);
        assert_eq!(c.0, 0x00D25003);
    }
}
