// ── Vertical scrollbar ────────────────────────────────────────────────────────
//
// One state transition per frame: wheel input moves the clamped position.
// The visual is a flat placeholder fill; any future thumb/track drawing must
// keep the clamped-position contract below intact.

use crate::gui::input::InputSnapshot;
use crate::gui::surface::{Color, Rect, Surface};

#[derive(Clone, Debug)]
pub(crate) struct Scrollbar {
    /// Upper bound of the scroll range.
    pub(crate) maximum: i32,
    /// Current offset, always in `[0, maximum]`.
    pub(crate) current: i32,
    /// Size of the visible window over the scrolled content.  Informational;
    /// a thumb visual would size itself from this.
    pub(crate) covered_range: i32,
    /// Wheel-tick multiplier.
    pub(crate) speed: i32,
}

impl Scrollbar {
    pub(crate) fn new(maximum: i32, covered_range: i32, speed: i32) -> Self {
        Scrollbar {
            maximum: maximum.max(0),
            current: 0,
            covered_range,
            speed,
        }
    }

    /// Change the scroll range, re-clamping the current position into it.
    pub(crate) fn set_maximum(&mut self, maximum: i32) {
        self.maximum = maximum.max(0);
        self.current = self.current.clamp(0, self.maximum);
    }

    pub(crate) fn update(&mut self, input: &InputSnapshot, surface: &mut dyn Surface, rect: Rect) {
        self.current = (self.current + input.wheel_delta * self.speed).clamp(0, self.maximum);
        surface.fill_rect(rect, Color::BLACK);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::surface::testing::{DrawOp, RecordingSurface};

    fn wheel(delta: i32) -> InputSnapshot {
        InputSnapshot {
            wheel_delta: delta,
            ..Default::default()
        }
    }

    #[test]
    fn wheel_moves_by_speed() {
        let mut sb = Scrollbar::new(1000, 100, 3);
        let mut surface = RecordingSurface::new();
        sb.update(&wheel(10), &mut surface, Rect::new(0, 0, 10, 100));
        assert_eq!(sb.current, 30);
    }

    #[test]
    fn position_clamps_to_range() {
        let mut sb = Scrollbar::new(50, 10, 1);
        let mut surface = RecordingSurface::new();

        sb.update(&wheel(200), &mut surface, Rect::new(0, 0, 10, 100));
        assert_eq!(sb.current, 50);

        sb.update(&wheel(-999), &mut surface, Rect::new(0, 0, 10, 100));
        assert_eq!(sb.current, 0);
    }

    #[test]
    fn set_maximum_reclamps_current() {
        let mut sb = Scrollbar::new(100, 10, 1);
        let mut surface = RecordingSurface::new();
        sb.update(&wheel(80), &mut surface, Rect::new(0, 0, 10, 100));
        assert_eq!(sb.current, 80);

        sb.set_maximum(40);
        assert_eq!(sb.current, 40);
    }

    #[test]
    fn draws_placeholder_fill() {
        let mut sb = Scrollbar::new(10, 5, 1);
        let mut surface = RecordingSurface::new();
        let rect = Rect::new(5, 5, 12, 80);
        sb.update(&wheel(0), &mut surface, rect);
        assert_eq!(
            surface.ops,
            vec![DrawOp::Fill {
                rect,
                color: Color::BLACK
            }]
        );
    }
}
