// ── Single-line edit box ──────────────────────────────────────────────────────
//
// Text buffer with a blinking insertion cursor.  ASCII only; capacity is
// fixed and overflow truncates silently — that is an invariant of the widget,
// not a reportable error.

use crate::gui::chrome::draw_sunken_box;
use crate::gui::input::{InputSnapshot, Key};
use crate::gui::style::Style;
use crate::gui::surface::{Rect, Surface};

/// Maximum number of characters the box holds.  Inserting into a full buffer
/// drops whatever falls off the end.
pub(crate) const EDIT_BOX_CAPACITY: usize = 127;

/// Seconds between cursor blink phase flips.
const BLINK_PERIOD: f64 = 0.5;

/// Backspace as it arrives through the typed-character queue.
const BACKSPACE: char = '\u{8}';

/// Delete as it arrives through the typed-character queue.
const DELETE: char = '\u{7F}';

#[derive(Clone, Debug)]
pub(crate) struct EditBox {
    text: String,
    /// Insertion point, always in `[0, text.len()]`.
    cursor: usize,
    /// Blink phase: whether the cursor bar is drawn this frame.
    cursor_on: bool,
    /// Absolute time of the next blink phase flip.
    next_blink: f64,
}

impl EditBox {
    pub(crate) fn new() -> Self {
        EditBox {
            text: String::new(),
            cursor: 0,
            cursor_on: false,
            next_blink: 0.0,
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Run one frame: process navigation and typed edits, then redraw.
    /// Returns `true` when a typed character was consumed this frame; a
    /// no-op edit (Backspace at the start, Delete at the end) still counts.
    pub(crate) fn update(
        &mut self,
        input: &InputSnapshot,
        surface: &mut dyn Surface,
        style: &Style,
        rect: Rect,
    ) -> bool {
        draw_sunken_box(surface, style, rect);
        let interior = rect.inset(style.scaled(2.0), style.scaled(4.0));
        surface.set_clip(interior);

        let now = input.time;
        if now > self.next_blink {
            self.cursor_on = !self.cursor_on;
            self.next_blink = now + BLINK_PERIOD;
        }

        // Navigation.  Resetting next_blink to `now` makes the phase flip on
        // the next frame's time check, keeping the cursor lively while it
        // moves.
        if input.was_pressed(Key::Left) {
            self.cursor = self.cursor.saturating_sub(1);
            self.next_blink = now;
        } else if input.was_pressed(Key::Right) {
            self.cursor = (self.cursor + 1).min(self.text.len());
            self.next_blink = now;
        } else if input.was_pressed(Key::Home) {
            self.cursor = 0;
            self.next_blink = now;
        } else if input.was_pressed(Key::End) {
            self.cursor = self.text.len();
            self.next_blink = now;
        }

        let mut contents_changed = false;
        for &c in &input.typed {
            if c == BACKSPACE {
                if self.cursor > 0 {
                    self.text.remove(self.cursor - 1);
                    self.cursor -= 1;
                }
            } else if c == DELETE {
                // Delete at end of text is a no-op.
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                }
            } else if c.is_ascii() && !c.is_ascii_control() {
                self.text.insert(self.cursor, c);
                self.text.truncate(EDIT_BOX_CAPACITY);
                self.cursor = (self.cursor + 1).min(self.text.len());
            } else {
                // Non-ASCII and stray control characters never reach the
                // buffer; the cursor and blink timer stay untouched too.
                continue;
            }

            contents_changed = true;
            self.next_blink = now;
        }

        surface.draw_text(interior.x, interior.y, style.text, &self.text);

        if self.cursor_on {
            let cursor_x = interior.x + surface.text_width(&self.text[..self.cursor]);
            surface.fill_rect(
                Rect::new(cursor_x, interior.y, style.scaled(2.0), surface.line_height()),
                style.text,
            );
        }

        surface.clear_clip();

        contents_changed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::surface::testing::{DrawOp, RecordingSurface};

    const RECT: Rect = Rect::new(0, 0, 400, 30);

    fn typed(chars: &str) -> InputSnapshot {
        InputSnapshot {
            typed: chars.chars().collect(),
            ..Default::default()
        }
    }

    fn pressed(key: Key) -> InputSnapshot {
        let mut input = InputSnapshot::default();
        input.press(key);
        input
    }

    fn run(eb: &mut EditBox, input: &InputSnapshot) -> bool {
        let mut surface = RecordingSurface::new();
        eb.update(input, &mut surface, &Style::default(), RECT)
    }

    // Scenario A: type "hello" into an empty box.
    #[test]
    fn typing_inserts_at_cursor() {
        let mut eb = EditBox::new();
        let changed = run(&mut eb, &typed("hello"));
        assert!(changed);
        assert_eq!(eb.text(), "hello");
        assert_eq!(eb.cursor, 5);
    }

    // Scenario B: Left twice, then type "X".
    #[test]
    fn insert_after_cursor_moves() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("hello"));
        run(&mut eb, &pressed(Key::Left));
        run(&mut eb, &pressed(Key::Left));
        run(&mut eb, &typed("X"));
        assert_eq!(eb.text(), "helXlo");
        assert_eq!(eb.cursor, 4);
    }

    #[test]
    fn backspace_deletes_before_cursor() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("abc"));
        run(&mut eb, &typed("\u{8}"));
        assert_eq!(eb.text(), "ab");
        assert_eq!(eb.cursor, 2);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("ab"));
        run(&mut eb, &pressed(Key::Home));
        let changed = run(&mut eb, &typed("\u{8}"));
        // The queued character still reports a change, matching the
        // every-queued-character contract.
        assert!(changed);
        assert_eq!(eb.text(), "ab");
        assert_eq!(eb.cursor, 0);
    }

    #[test]
    fn delete_removes_at_cursor() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("abc"));
        run(&mut eb, &pressed(Key::Home));
        run(&mut eb, &typed("\u{7f}"));
        assert_eq!(eb.text(), "bc");
        assert_eq!(eb.cursor, 0);
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("abc"));
        run(&mut eb, &typed("\u{7f}"));
        assert_eq!(eb.text(), "abc");
        assert_eq!(eb.cursor, 3);
    }

    /// Insert-then-Backspace at the same cursor restores the original string
    /// and cursor (round-trip law), absent truncation.
    #[test]
    fn insert_backspace_round_trip() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("hello"));
        run(&mut eb, &pressed(Key::Left));
        run(&mut eb, &pressed(Key::Left));
        run(&mut eb, &typed("Q\u{8}"));
        assert_eq!(eb.text(), "hello");
        assert_eq!(eb.cursor, 3);
    }

    #[test]
    fn navigation_clamps_to_bounds() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("ab"));
        run(&mut eb, &pressed(Key::Right));
        assert_eq!(eb.cursor, 2);
        run(&mut eb, &pressed(Key::Home));
        run(&mut eb, &pressed(Key::Left));
        assert_eq!(eb.cursor, 0);
        run(&mut eb, &pressed(Key::End));
        assert_eq!(eb.cursor, 2);
    }

    #[test]
    fn overflow_truncates_silently() {
        let mut eb = EditBox::new();
        for _ in 0..3 {
            run(&mut eb, &typed(&"x".repeat(50)));
        }
        assert_eq!(eb.text().len(), EDIT_BOX_CAPACITY);
        assert_eq!(eb.cursor, EDIT_BOX_CAPACITY);

        // Still full after more typing; cursor stays in bounds.
        run(&mut eb, &typed("y"));
        assert_eq!(eb.text().len(), EDIT_BOX_CAPACITY);
        assert!(eb.cursor <= eb.text().len());
    }

    #[test]
    fn mid_text_insert_when_full_drops_last_char() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed(&"a".repeat(EDIT_BOX_CAPACITY)));
        run(&mut eb, &pressed(Key::Home));
        run(&mut eb, &typed("Z"));
        assert_eq!(eb.text().len(), EDIT_BOX_CAPACITY);
        assert!(eb.text().starts_with('Z'));
        assert_eq!(eb.cursor, 1);
    }

    /// Length bookkeeping: net inserts minus net deletes, for a mixed
    /// sequence below capacity.
    #[test]
    fn length_tracks_net_edits() {
        let mut eb = EditBox::new();
        run(&mut eb, &typed("abcdef"));       // +6
        run(&mut eb, &typed("\u{8}\u{8}"));   // -2
        run(&mut eb, &pressed(Key::Home));
        run(&mut eb, &typed("\u{7f}"));       // -1
        run(&mut eb, &typed("xy"));           // +2
        assert_eq!(eb.text().len(), 5);
        assert_eq!(eb.text(), "xybcd");
    }

    #[test]
    fn non_ascii_input_is_ignored() {
        let mut eb = EditBox::new();
        let changed = run(&mut eb, &typed("é"));
        assert!(!changed);
        assert_eq!(eb.text(), "");
    }

    // ── Blink timing ──────────────────────────────────────────────────────────

    fn at_time(time: f64) -> InputSnapshot {
        InputSnapshot {
            time,
            ..Default::default()
        }
    }

    #[test]
    fn cursor_blinks_on_a_half_second_period() {
        let mut eb = EditBox::new();
        // time 0.1 > next_blink 0.0: flips on, schedules 0.6.
        run(&mut eb, &at_time(0.1));
        assert!(eb.cursor_on);

        // Before the deadline: no flip.
        run(&mut eb, &at_time(0.5));
        assert!(eb.cursor_on);

        // Past the deadline: flips off.
        run(&mut eb, &at_time(0.7));
        assert!(!eb.cursor_on);
    }

    #[test]
    fn typing_resets_the_blink_timer() {
        let mut eb = EditBox::new();
        run(&mut eb, &at_time(0.1));
        assert_eq!(eb.next_blink, 0.6);

        let mut input = typed("a");
        input.time = 0.2;
        run(&mut eb, &input);
        // Reset to `now`, so the very next time check flips the phase.
        assert_eq!(eb.next_blink, 0.2);
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    #[test]
    fn cursor_bar_sits_after_measured_prefix() {
        let mut eb = EditBox::new();
        let mut surface = RecordingSurface::new();
        let style = Style::default();

        let mut input = typed("hello");
        input.time = 0.1; // blink flips on before drawing
        eb.update(&input, &mut surface, &style, RECT);

        // Interior origin is (2, 4) at scale 1.0; prefix "hello" measures
        // 5 * 8 px on the recording surface.
        let bar = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { rect, color } if *color == style.text => Some(*rect),
                _ => None,
            })
            .next_back()
            .expect("cursor bar fill");
        assert_eq!(bar.x, 2 + 5 * RecordingSurface::CHAR_WIDTH);
        assert_eq!(bar.y, 4);
        assert_eq!(bar.h, RecordingSurface::LINE_HEIGHT);
    }

    #[test]
    fn clip_is_set_and_cleared_around_text() {
        let mut eb = EditBox::new();
        let mut surface = RecordingSurface::new();
        eb.update(&typed("hi"), &mut surface, &Style::default(), RECT);

        let clip_pos = surface
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Clip(_)))
            .expect("clip set");
        assert_eq!(
            surface.ops.last(),
            Some(&DrawOp::ClearClip),
            "clip must be cleared on exit"
        );
        // Interior inset: 2 px horizontal, 4 px vertical at scale 1.0.
        assert_eq!(surface.ops[clip_pos], DrawOp::Clip(Rect::new(2, 4, 396, 22)));
        assert!(surface.clip.is_none());
    }
}
