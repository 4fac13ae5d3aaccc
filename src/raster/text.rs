//! # Text Labels
//!
//! Renders short text into a label bitmap using the Spleen 12x24 bitmap
//! font.
//!
//! Text is laid out along the label (landscape), one line per `\n`, then
//! turned 90° clockwise into print orientation so the start of the text
//! prints first:
//!
//! ```text
//!   length_px                         width_px
//! ┌───────────────┐                 ┌──────┐
//! │ HELLO         │ width_px   →    │  H   │
//! │ WORLD         │                 │  ... │ length_px
//! └───────────────┘                 └──────┘
//! ```
//!
//! Glyphs are scaled by the largest whole factor (up to 4) at which every
//! line fits across the label. Text longer than the label is clipped.

use spleen_font::{FONT_12X24, PSF2Font};

use super::bitmap::{Bitmap, MonoBitmap};
use crate::error::{NiimprintError, Result};

/// Glyph cell width of the font
pub const GLYPH_WIDTH: usize = 12;

/// Glyph cell height of the font
pub const GLYPH_HEIGHT: usize = 24;

/// Blank dots before the first character
pub const LEFT_MARGIN: usize = 8;

const MAX_SCALE: usize = 4;

/// Render `text` onto a label `width_px` dots across and `length_px` dots
/// long, returned in print orientation (`width_px` wide).
pub fn render_text(text: &str, width_px: usize, length_px: usize) -> Result<Bitmap> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() || lines.iter().all(|l| l.trim().is_empty()) {
        return Err(NiimprintError::Precondition("label text is empty".to_string()));
    }

    let scale = (width_px / (lines.len() * GLYPH_HEIGHT)).min(MAX_SCALE);
    if scale == 0 {
        return Err(NiimprintError::Precondition(format!(
            "{} lines of text do not fit across a {} px label",
            lines.len(),
            width_px
        )));
    }

    let mut font = PSF2Font::new(FONT_12X24)
        .map_err(|_| NiimprintError::Image("failed to load built-in font".to_string()))?;

    // Landscape canvas: x along the label, y across it
    let mut canvas = Bitmap::new(length_px, width_px);
    let line_height = GLYPH_HEIGHT * scale;
    let top = (width_px - lines.len() * line_height) / 2;

    for (i, line) in lines.iter().enumerate() {
        let y0 = top + i * line_height;
        for (j, ch) in line.chars().enumerate() {
            let x0 = LEFT_MARGIN + j * GLYPH_WIDTH * scale;
            if x0 >= length_px {
                break;
            }
            let cell = glyph(&mut font, ch);
            draw_glyph(&mut canvas, &cell, x0, y0, scale);
        }
    }

    Ok(rotate_clockwise(&canvas))
}

/// 1-bit cell for `ch`, row-major. Unknown characters become a box.
fn glyph(font: &mut PSF2Font, ch: char) -> Vec<bool> {
    let mut cell = vec![false; GLYPH_WIDTH * GLYPH_HEIGHT];
    let utf8 = ch.to_string();

    match font.glyph_for_utf8(utf8.as_bytes()) {
        Some(rows) => {
            for (y, row) in rows.enumerate() {
                for (x, on) in row.enumerate() {
                    if x < GLYPH_WIDTH && y < GLYPH_HEIGHT {
                        cell[y * GLYPH_WIDTH + x] = on;
                    }
                }
            }
        }
        None => {
            for x in 0..GLYPH_WIDTH {
                cell[x] = true;
                cell[(GLYPH_HEIGHT - 1) * GLYPH_WIDTH + x] = true;
            }
            for y in 0..GLYPH_HEIGHT {
                cell[y * GLYPH_WIDTH] = true;
                cell[y * GLYPH_WIDTH + GLYPH_WIDTH - 1] = true;
            }
        }
    }
    cell
}

fn draw_glyph(canvas: &mut Bitmap, cell: &[bool], x0: usize, y0: usize, scale: usize) {
    for gy in 0..GLYPH_HEIGHT {
        for gx in 0..GLYPH_WIDTH {
            if !cell[gy * GLYPH_WIDTH + gx] {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let (x, y) = (x0 + gx * scale + dx, y0 + gy * scale + dy);
                    if x < canvas.width() && y < canvas.height() {
                        canvas.set(x, y, true);
                    }
                }
            }
        }
    }
}

/// Turn a bitmap 90° clockwise: the left column becomes the top row.
pub fn rotate_clockwise<B: MonoBitmap + ?Sized>(src: &B) -> Bitmap {
    let h = src.height();
    Bitmap::from_fn(h, src.width(), |x, y| src.pixel(y, h - 1 - x))
}
