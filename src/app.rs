// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `App` is created on startup and owned by the window state for the
// lifetime of the main window.  All mutations happen on the UI thread — there
// is no global mutable state; the shared `Style` lives here and is passed by
// reference into every widget call.
//
// Per-frame wiring:
//   • filter edit box across the top (narrows the module list by name),
//   • module list on the left, largest code contribution first,
//   • placeholder scrollbar along the list's right edge,
//   • detail text view on the right, re-filled only when the selection or
//     the filter changes.

use crate::gui::edit_box::EditBox;
use crate::gui::input::InputSnapshot;
use crate::gui::list_view::ListView;
use crate::gui::scrollbar::Scrollbar;
use crate::gui::style::Style;
use crate::gui::surface::{Rect, Surface};
use crate::gui::text_view::TextView;
use crate::pdb::DumpSummary;

/// Wheel-tick multiplier for the module-list scrollbar.
const LIST_SCROLL_SPEED: i32 = 1;

/// Top-level application state.
pub(crate) struct App {
    pub(crate) style: Style,
    filter: EditBox,
    module_list: ListView,
    list_scrollbar: Scrollbar,
    detail: TextView,

    summary: DumpSummary,
    /// Display rows for the module list, rebuilt when the filter changes.
    rows: Vec<String>,
    /// `summary.modules` index behind each display row.
    row_modules: Vec<usize>,
}

impl App {
    pub(crate) fn new(summary: DumpSummary, draw_scale: f64) -> Self {
        let mut app = App {
            style: Style {
                draw_scale,
                ..Default::default()
            },
            filter: EditBox::new(),
            module_list: ListView::new(),
            list_scrollbar: Scrollbar::new(0, 0, LIST_SCROLL_SPEED),
            detail: TextView::new(),
            summary,
            rows: Vec::new(),
            row_modules: Vec::new(),
        };
        app.rebuild_rows();
        app.refresh_detail();
        app
    }

    /// Run one frame against the given client area.  Returns `true` when the
    /// zoom gesture changed the draw scale, which tells the platform layer to
    /// re-select its font before the next frame.
    pub(crate) fn frame(
        &mut self,
        input: &InputSnapshot,
        surface: &mut dyn Surface,
        client_w: i32,
        client_h: i32,
    ) -> bool {
        let scale_changed = self.style.handle_zoom(input);

        // Window background; the widgets repaint their own rects over it.
        surface.fill_rect(Rect::new(0, 0, client_w, client_h), self.style.frame);

        // ── Layout ────────────────────────────────────────────────────────────
        let margin = self.style.scaled(8.0);
        let filter_h = surface.line_height() + self.style.scaled(12.0);
        let scrollbar_w = self.style.scaled(14.0);

        let filter_rect = Rect::new(margin, margin, client_w - 2 * margin, filter_h);

        let content_y = 2 * margin + filter_h;
        let content_h = client_h - content_y - margin;
        let list_w = (client_w - 2 * margin) * 2 / 5;

        let list_rect = Rect::new(margin, content_y, list_w - scrollbar_w, content_h);
        let scrollbar_rect = Rect::new(margin + list_w - scrollbar_w, content_y, scrollbar_w, content_h);
        let detail_rect = Rect::new(
            margin + list_w + margin,
            content_y,
            client_w - list_w - 3 * margin,
            content_h,
        );

        // ── Widgets ───────────────────────────────────────────────────────────
        let filter_changed = self.filter.update(input, surface, &self.style, filter_rect);
        if filter_changed {
            self.rebuild_rows();
            self.module_list.reset();
        }

        let selection_changed = self
            .module_list
            .update(input, surface, &self.style, list_rect, &self.rows)
            .is_some();

        self.list_scrollbar
            .set_maximum(self.rows.len() as i32 - 1);
        self.list_scrollbar.update(input, surface, scrollbar_rect);

        if filter_changed || selection_changed {
            self.refresh_detail();
        }
        self.detail.update(surface, &self.style, detail_rect);

        scale_changed
    }

    // ── Row building ──────────────────────────────────────────────────────────

    /// Rebuild the visible module rows from the current filter text:
    /// case-insensitive substring match, largest code size first.
    fn rebuild_rows(&mut self) {
        let needle = self.filter.text().to_ascii_lowercase();

        let mut indices: Vec<usize> = (0..self.summary.modules.len())
            .filter(|&i| {
                needle.is_empty()
                    || self.summary.modules[i]
                        .name
                        .to_ascii_lowercase()
                        .contains(&needle)
            })
            .collect();
        indices.sort_by(|&a, &b| {
            let (ma, mb) = (&self.summary.modules[a], &self.summary.modules[b]);
            mb.code_bytes()
                .cmp(&ma.code_bytes())
                .then_with(|| ma.name.cmp(&mb.name))
        });

        self.rows = indices
            .iter()
            .map(|&i| {
                let m = &self.summary.modules[i];
                format!("{:>7.1} KiB  {}", m.code_bytes() as f64 / 1024.0, m.name)
            })
            .collect();
        self.row_modules = indices;
    }

    // ── Detail text ───────────────────────────────────────────────────────────

    /// Re-fill the detail view for the currently selected row (or the
    /// dump-wide totals when nothing is selected).
    fn refresh_detail(&mut self) {
        self.detail.clear();
        self.detail.append(&format!(
            "Dump totals: {} functions, {} code bytes\n\n",
            self.summary.total_functions, self.summary.total_code_bytes
        ));

        let selected = self.module_list.selected();
        let Some(&module_idx) = usize::try_from(selected)
            .ok()
            .and_then(|row| self.row_modules.get(row))
        else {
            return;
        };
        let module = &self.summary.modules[module_idx];

        self.detail.append(&format!("Module: {}\n", module.name));
        self.detail.append(&format!(
            "{} bytes of code in {} functions, {} data objects\n\n",
            module.code_bytes(),
            module.functions.len(),
            module.data_objects.len()
        ));

        if !module.functions.is_empty() {
            self.detail.append("Functions:\n");
            for f in &module.functions {
                self.detail
                    .append(&format!("{:>8}  {}\n", f.num_bytes, f.name));
            }
        }

        if !module.data_objects.is_empty() {
            self.detail.append("\nData objects:\n");
            for d in &module.data_objects {
                let type_id = if d.type_id < 0 {
                    "primitive".to_owned()
                } else {
                    format!("{:#x}", d.type_id)
                };
                self.detail.append(&format!("{:>10}  {}\n", type_id, d.name));
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
