//! # Text Interface
//!
//! The engine never rasterizes fonts itself. A [`TextShaper`] turns a line
//! into glyph placements and a placement into an atlas slot; everything
//! here is built on those two calls.
//!
//! Failures are soft. A line that cannot be shaped or a glyph that cannot
//! be rasterized is logged and left out, and the frame goes on.

use arbor_core::{Vec2, Vec4};

use crate::error::GlyphError;
use crate::layout::Rect;

/// One shaped glyph, relative to the start of its line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    /// Glyph index in the source font.
    pub glyph: u32,
    /// Pen offset from the line start.
    pub x: f32,
    /// Vertical pen offset.
    pub y: f32,
    /// Horizontal advance after this glyph.
    pub advance: f32,
}

/// A rasterized glyph in the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSlot {
    /// Bitmap width.
    pub width: f32,
    /// Bitmap height.
    pub height: f32,
    /// Left side bearing.
    pub bearing_x: f32,
    /// Distance from the baseline to the bitmap top.
    pub bearing_y: f32,
    /// Atlas region (x, y, w, h) in pixels.
    pub texture_rect: Vec4,
    /// Single-channel coverage bitmap rather than colour.
    pub grayscale: bool,
}

/// Shaping and rasterization backend.
pub trait TextShaper {
    /// Shapes a single line (no `\n`).
    ///
    /// # Errors
    ///
    /// [`GlyphError::Shaping`] if the line cannot be shaped.
    fn shape(&self, line: &str) -> Result<Vec<GlyphPlacement>, GlyphError>;

    /// Returns the atlas slot for a placement, rasterizing it if needed.
    ///
    /// # Errors
    ///
    /// [`GlyphError::TooLarge`] if the bitmap does not fit an atlas slot.
    fn rasterize(&mut self, glyph: &GlyphPlacement) -> Result<GlyphSlot, GlyphError>;

    /// Distance between baselines, spacing excluded.
    fn line_height(&self) -> f32;
}

/// Fixed-cell shaper: every character is one cell wide.
///
/// Whitespace advances the pen but produces no glyph.
#[derive(Debug, Clone)]
pub struct MonospaceShaper {
    cell_width: f32,
    line_height: f32,
    atlas_slot: u32,
}

/// Atlas slots per row.
const ATLAS_COLUMNS: u32 = 16;

impl MonospaceShaper {
    /// Creates a shaper with the given cell metrics.
    #[must_use]
    pub const fn new(cell_width: f32, line_height: f32, atlas_slot: u32) -> Self {
        Self { cell_width, line_height, atlas_slot }
    }
}

impl TextShaper for MonospaceShaper {
    fn shape(&self, line: &str) -> Result<Vec<GlyphPlacement>, GlyphError> {
        let mut pen = 0.0;
        let mut out = Vec::with_capacity(line.len());
        for c in line.chars() {
            if !c.is_whitespace() {
                out.push(GlyphPlacement {
                    glyph: u32::from(c),
                    x: pen,
                    y: 0.0,
                    advance: self.cell_width,
                });
            }
            pen += self.cell_width;
        }
        Ok(out)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn rasterize(&mut self, glyph: &GlyphPlacement) -> Result<GlyphSlot, GlyphError> {
        let width = self.cell_width.ceil() as u32;
        let height = self.line_height.ceil() as u32;
        if width > self.atlas_slot || height > self.atlas_slot {
            return Err(GlyphError::TooLarge {
                glyph: glyph.glyph,
                width,
                height,
                slot: self.atlas_slot,
            });
        }

        let cell = glyph.glyph % (ATLAS_COLUMNS * ATLAS_COLUMNS);
        let slot = self.atlas_slot as f32;
        Ok(GlyphSlot {
            width: self.cell_width,
            height: self.line_height,
            bearing_x: 0.0,
            bearing_y: self.line_height,
            texture_rect: Vec4::new(
                (cell % ATLAS_COLUMNS) as f32 * slot,
                (cell / ATLAS_COLUMNS) as f32 * slot,
                self.cell_width,
                self.line_height,
            ),
            grayscale: true,
        })
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// A glyph positioned on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    /// Screen rect of the bitmap.
    pub rect: Rect,
    /// Atlas slot.
    pub slot: GlyphSlot,
}

/// Lays out `text` with the bottom of its first line at `origin.y`,
/// returning the glyph quads and the text rect.
///
/// Lines are split on `\n` and separated by `line_spacing`.
pub fn layout_text(
    shaper: &mut dyn TextShaper,
    text: &str,
    origin: Vec2,
    line_spacing: f32,
) -> (Vec<PlacedGlyph>, Rect) {
    let mut glyphs = Vec::new();
    let line_height = shaper.line_height();
    let mut widest = 0.0_f32;
    let mut y_offset = 0.0;

    for line in text.split('\n') {
        let placements = shaper.shape(line).unwrap_or_else(|err| {
            tracing::warn!("{err}");
            Vec::new()
        });

        for info in &placements {
            match shaper.rasterize(info) {
                Ok(slot) => {
                    let x = origin.x + info.x + slot.bearing_x;
                    let y = origin.y + y_offset + info.y - slot.bearing_y;
                    glyphs.push(PlacedGlyph { rect: Rect::new(x, y, slot.width, slot.height), slot });
                }
                Err(err) => tracing::warn!("{err}"),
            }
        }

        if let Some(last) = placements.last() {
            widest = widest.max(last.x + last.advance);
        }
        y_offset += line_height + line_spacing;
    }

    let rect = Rect::new(origin.x, origin.y, widest, y_offset - line_spacing);
    (glyphs, rect)
}

/// Measures `text` without rasterizing it.
#[must_use]
pub fn measure_text(shaper: &dyn TextShaper, text: &str, line_spacing: f32) -> Vec2 {
    let line_height = shaper.line_height();
    let mut widest = 0.0_f32;
    let mut lines = 0_u16;

    for line in text.split('\n') {
        match shaper.shape(line) {
            Ok(placements) => {
                if let Some(last) = placements.last() {
                    widest = widest.max(last.x + last.advance);
                }
            }
            Err(err) => tracing::warn!("{err}"),
        }
        lines = lines.saturating_add(1);
    }

    let n = f32::from(lines);
    Vec2::new(widest, n * line_height + (n - 1.0) * line_spacing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_multiline() {
        let shaper = MonospaceShaper::new(8.0, 16.0, 32);
        let size = measure_text(&shaper, "abc\nhello", 2.0);
        assert_eq!(size, Vec2::new(40.0, 34.0));
    }

    #[test]
    fn test_layout_matches_measure() {
        let mut shaper = MonospaceShaper::new(8.0, 16.0, 32);
        let (glyphs, rect) = layout_text(&mut shaper, "a b", Vec2::new(10.0, 50.0), 2.0);

        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].rect, Rect::new(10.0, 34.0, 8.0, 16.0));
        assert_eq!(glyphs[1].rect.x, 26.0);
        assert_eq!(rect, Rect::new(10.0, 50.0, 24.0, 16.0));
    }

    #[test]
    fn test_oversized_glyph_is_dropped() {
        let mut shaper = MonospaceShaper::new(40.0, 16.0, 32);
        let (glyphs, rect) = layout_text(&mut shaper, "ab", Vec2::ZERO, 2.0);
        assert!(glyphs.is_empty());
        assert_eq!(rect.width, 80.0);

        let placement = shaper.shape("a").unwrap()[0];
        assert!(matches!(shaper.rasterize(&placement), Err(GlyphError::TooLarge { .. })));
    }
}
