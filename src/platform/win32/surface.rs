// ── GDI backbuffer surface ────────────────────────────────────────────────────
//
// Implements `gui::Surface` over an offscreen GDI bitmap: widgets fill rects
// and draw text into the memory DC, and `present` blits the finished frame to
// the window in one step.  Text metrics come from the currently selected
// font, which is re-picked from a discrete height table whenever the draw
// scale changes.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::{COLORREF, RECT, SIZE},
    Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreateFontIndirectW, CreateRectRgn,
        CreateSolidBrush, DeleteDC, DeleteObject, FillRect, GetTextExtentPoint32W,
        GetTextMetricsW, SelectClipRgn, SelectObject, SetBkMode, SetTextColor, TextOutW,
        CLEARTYPE_QUALITY, CLIP_DEFAULT_PRECIS, DEFAULT_CHARSET, FF_SWISS,
        FONT_PITCH_AND_FAMILY, FW_NORMAL, HBITMAP, HDC, HFONT, HGDIOBJ, LOGFONTW,
        OUT_DEFAULT_PRECIS, SRCCOPY, TEXTMETRICW, TRANSPARENT, VARIABLE_PITCH,
    },
};

use crate::error::{BloatviewError, Result};
use crate::gui::surface::{Color, Rect, Surface};

// ── Font table ────────────────────────────────────────────────────────────────

/// Discrete font pixel heights the zoom gesture snaps to.  Covers the whole
/// supported scale range (13 px at scale 0.7 up to scale 3.0).
const FONT_PIXEL_HEIGHTS: &[i32] = &[9, 10, 11, 12, 13, 15, 17, 20, 23, 27, 31, 36, 40];

/// The table entry nearest to `desired` pixels.
fn nearest_font_height(desired: f64) -> i32 {
    let mut best = FONT_PIXEL_HEIGHTS[0];
    let mut best_delta = (best as f64 - desired).abs();
    for &h in &FONT_PIXEL_HEIGHTS[1..] {
        let delta = (h as f64 - desired).abs();
        if delta < best_delta {
            best = h;
            best_delta = delta;
        }
    }
    best
}

/// Bloatview's RGB to GDI's 0x00BBGGRR.
fn colorref(c: Color) -> COLORREF {
    COLORREF(((c.b() as u32) << 16) | ((c.g() as u32) << 8) | c.r() as u32)
}

// ── GdiSurface ────────────────────────────────────────────────────────────────

/// An offscreen bitmap plus the memory DC it is selected into.
///
/// Owns every GDI object it creates; `Drop` restores the DC's original
/// selections before deleting them.
pub(crate) struct GdiSurface {
    mem_dc: HDC,
    backbuffer: HBITMAP,
    old_bitmap: HGDIOBJ,
    font: HFONT,
    old_font: HGDIOBJ,
    width: i32,
    height: i32,
    line_height: i32,
}

impl GdiSurface {
    /// Create a backbuffer compatible with `window_dc`, sized `w` × `h`, with
    /// the font nearest `desired_text_height` selected.
    pub(crate) fn new(window_dc: HDC, w: i32, h: i32, desired_text_height: f64) -> Result<Self> {
        // SAFETY: window_dc is a live DC supplied by the caller; a compatible
        // memory DC starts with a 1×1 monochrome bitmap selected.
        let mem_dc = unsafe { CreateCompatibleDC(window_dc) };
        if mem_dc.is_invalid() {
            return Err(BloatviewError::Win32 {
                function: "CreateCompatibleDC",
                code: 0,
            });
        }

        // SAFETY: both DCs are valid; dimensions are clamped positive so the
        // bitmap allocation cannot be degenerate.
        let backbuffer = unsafe { CreateCompatibleBitmap(window_dc, w.max(1), h.max(1)) };
        if backbuffer.is_invalid() {
            // SAFETY: mem_dc was created above and nothing is selected into it.
            unsafe {
                let _ = DeleteDC(mem_dc);
            }
            return Err(BloatviewError::Win32 {
                function: "CreateCompatibleBitmap",
                code: 0,
            });
        }

        // SAFETY: mem_dc and backbuffer are valid; SelectObject returns the
        // previously selected bitmap, which we restore in Drop.
        let old_bitmap = unsafe { SelectObject(mem_dc, backbuffer.into()) };

        let mut surface = GdiSurface {
            mem_dc,
            backbuffer,
            old_bitmap,
            font: HFONT::default(),
            old_font: HGDIOBJ::default(),
            width: w.max(1),
            height: h.max(1),
            line_height: 0,
        };
        surface.select_font(desired_text_height)?;
        Ok(surface)
    }

    /// Replace the backbuffer after a window resize.  Keeps the font.
    pub(crate) fn resize(&mut self, window_dc: HDC, w: i32, h: i32) -> Result<()> {
        // SAFETY: window_dc is live; the old backbuffer is swapped out of the
        // memory DC before deletion, so GDI never frees a selected bitmap.
        unsafe {
            let bitmap = CreateCompatibleBitmap(window_dc, w.max(1), h.max(1));
            if bitmap.is_invalid() {
                return Err(BloatviewError::Win32 {
                    function: "CreateCompatibleBitmap",
                    code: 0,
                });
            }
            SelectObject(self.mem_dc, bitmap.into());
            let _ = DeleteObject(self.backbuffer.into());
            self.backbuffer = bitmap;
        }
        self.width = w.max(1);
        self.height = h.max(1);
        Ok(())
    }

    /// Pick the table font nearest `desired_text_height` and select it.
    /// Called once at startup and again whenever the zoom gesture changes
    /// the draw scale.
    pub(crate) fn select_font(&mut self, desired_text_height: f64) -> Result<()> {
        let height = nearest_font_height(desired_text_height);

        let mut logfont = LOGFONTW {
            // Positive lfHeight requests a full cell height, matching the
            // table entries.
            lfHeight: height,
            lfWeight: FW_NORMAL.0 as i32,
            lfCharSet: DEFAULT_CHARSET,
            lfOutPrecision: OUT_DEFAULT_PRECIS,
            lfClipPrecision: CLIP_DEFAULT_PRECIS,
            lfQuality: CLEARTYPE_QUALITY,
            lfPitchAndFamily: FONT_PITCH_AND_FAMILY(VARIABLE_PITCH.0 | FF_SWISS.0),
            ..Default::default()
        };
        for (dst, src) in logfont.lfFaceName.iter_mut().zip("Segoe UI".encode_utf16()) {
            *dst = src;
        }

        // SAFETY: logfont is fully initialised and lfFaceName stays
        // null-terminated (the face name is shorter than the field).
        // A null HFONT on failure is checked below.
        let font = unsafe { CreateFontIndirectW(&logfont) };
        if font.is_invalid() {
            return Err(BloatviewError::Win32 {
                function: "CreateFontIndirectW",
                code: 0,
            });
        }

        // SAFETY: mem_dc and font are valid.  The first selection stores the
        // DC's stock font for restoration in Drop; later selections swap out
        // our previous font, which is then safe to delete.
        unsafe {
            let previous = SelectObject(self.mem_dc, font.into());
            if self.font.is_invalid() {
                self.old_font = previous;
            } else {
                let _ = DeleteObject(self.font.into());
            }
            self.font = font;

            let mut metrics = TEXTMETRICW::default();
            let _ = GetTextMetricsW(self.mem_dc, &mut metrics);
            self.line_height = metrics.tmHeight.max(1);
        }
        Ok(())
    }

    /// Blit the finished frame onto the window.
    pub(crate) fn present(&self, window_dc: HDC) {
        // SAFETY: both DCs are valid and the blit rectangle is the
        // backbuffer's own extent.
        unsafe {
            let _ = BitBlt(
                window_dc,
                0,
                0,
                self.width,
                self.height,
                self.mem_dc,
                0,
                0,
                SRCCOPY,
            );
        }
    }

    pub(crate) fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

impl Surface for GdiSurface {
    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn text_width(&self, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }
        let wide: Vec<u16> = text.encode_utf16().collect();
        let mut size = SIZE::default();
        // SAFETY: mem_dc is valid with a font selected; `wide` outlives the
        // call and the extent is written into `size`.
        unsafe {
            let _ = GetTextExtentPoint32W(self.mem_dc, &wide, &mut size);
        }
        size.cx
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }
        let gdi_rect = RECT {
            left: rect.x,
            top: rect.y,
            right: rect.right(),
            bottom: rect.bottom(),
        };
        // SAFETY: mem_dc is valid; the brush is created and deleted within
        // this call, after FillRect has finished using it.
        unsafe {
            let brush = CreateSolidBrush(colorref(color));
            let _ = FillRect(self.mem_dc, &gdi_rect, brush);
            let _ = DeleteObject(brush.into());
        }
    }

    fn set_clip(&mut self, rect: Rect) {
        // SAFETY: mem_dc is valid.  SelectClipRgn copies the region, so it
        // is deleted immediately after selection.
        unsafe {
            let rgn = CreateRectRgn(rect.x, rect.y, rect.right(), rect.bottom());
            SelectClipRgn(self.mem_dc, rgn);
            let _ = DeleteObject(rgn.into());
        }
    }

    fn clear_clip(&mut self) {
        // SAFETY: mem_dc is valid; a null region removes the clip entirely.
        unsafe {
            SelectClipRgn(self.mem_dc, None);
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, color: Color, text: &str) {
        if text.is_empty() {
            return;
        }
        let wide: Vec<u16> = text.encode_utf16().collect();
        // SAFETY: mem_dc is valid with a font selected; `wide` outlives the
        // TextOutW call.  Transparent background so row highlights show
        // through glyph cells.
        unsafe {
            SetBkMode(self.mem_dc, TRANSPARENT);
            SetTextColor(self.mem_dc, colorref(color));
            let _ = TextOutW(self.mem_dc, x, y, &wide);
        }
    }
}

impl Drop for GdiSurface {
    fn drop(&mut self) {
        // SAFETY: every handle below was created by this struct and is
        // deleted exactly once, after the DC's original selections have been
        // restored.
        unsafe {
            SelectObject(self.mem_dc, self.old_bitmap);
            if !self.font.is_invalid() {
                SelectObject(self.mem_dc, self.old_font);
                let _ = DeleteObject(self.font.into());
            }
            let _ = DeleteObject(self.backbuffer.into());
            let _ = DeleteDC(self.mem_dc);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
