//! Print-text rasterization
//!
//! Renders up to three lines of print text onto a fixed 512x512 canvas: white
//! background, black fill, fixed glyph scale, centered on both axes. Output is
//! fully deterministic for a given input — the font comes from egui's embedded
//! default set, so no system font lookup can change the result between
//! machines or runs.

use rusttype::{point, Font, Scale};

use super::{RenderTexture, TextureError};
use crate::artwork::PrintText;

/// Square canvas edge in pixels
pub const CANVAS_SIZE: u32 = 512;
/// Glyph scale in canvas units
pub const FONT_SCALE: f32 = 40.0;

/// Embedded font preferred for print text
const PREFERRED_FONT: &str = "Ubuntu-Light";

/// Deterministic text-to-raster converter
pub struct TextRasterizer {
    font: Font<'static>,
}

impl TextRasterizer {
    /// Create a rasterizer backed by one of egui's embedded fonts
    pub fn new() -> Result<Self, TextureError> {
        let mut defs = egui::FontDefinitions::default();

        // Prefer the proportional face; fall back to any parseable entry
        let mut candidates: Vec<Vec<u8>> = Vec::new();
        if let Some(data) = defs.font_data.remove(PREFERRED_FONT) {
            candidates.push(data.font.to_vec());
        }
        for (_, data) in defs.font_data {
            candidates.push(data.font.to_vec());
        }

        for bytes in candidates {
            if let Some(font) = Font::try_from_vec(bytes) {
                return Ok(Self { font });
            }
        }
        Err(TextureError::FontUnavailable)
    }

    /// Rasterize print text onto the fixed-size canvas
    pub fn rasterize(&self, text: &PrintText) -> RenderTexture {
        let size = CANVAS_SIZE as i32;
        // White background, opaque
        let mut data = vec![255u8; (CANVAS_SIZE * CANVAS_SIZE * 4) as usize];

        let scale = Scale::uniform(FONT_SCALE);
        let v_metrics = self.font.v_metrics(scale);
        let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;

        let lines = text.lines();
        let block_height = line_height * lines.len() as f32;
        let block_top = (CANVAS_SIZE as f32 - block_height) / 2.0;

        for (i, line) in lines.iter().enumerate() {
            let baseline = block_top + v_metrics.ascent + line_height * i as f32;
            let glyphs: Vec<_> = self
                .font
                .layout(line, scale, point(0.0, baseline))
                .collect();

            // Center-anchor: measure the laid-out line, then offset
            let line_width = glyphs
                .last()
                .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0);
            let x_offset = (CANVAS_SIZE as f32 - line_width) / 2.0;

            for glyph in &glyphs {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let px = gx as i32 + bb.min.x + x_offset as i32;
                    let py = gy as i32 + bb.min.y;
                    if px < 0 || py < 0 || px >= size || py >= size {
                        return;
                    }
                    // Black ink over white: darker coverage wins
                    let ink = 255 - (coverage * 255.0) as u8;
                    let idx = ((py * size + px) * 4) as usize;
                    for c in 0..3 {
                        data[idx + c] = data[idx + c].min(ink);
                    }
                });
            }
        }

        RenderTexture {
            width: CANVAS_SIZE,
            height: CANVAS_SIZE,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterization_idempotent() {
        let rasterizer = TextRasterizer::new().unwrap();
        let text = PrintText::from_input("Hello\nWorld");
        let a = rasterizer.rasterize(&text);
        let b = rasterizer.rasterize(&text);
        assert_eq!(a, b);
    }

    #[test]
    fn test_canvas_dimensions() {
        let rasterizer = TextRasterizer::new().unwrap();
        let tex = rasterizer.rasterize(&PrintText::from_input("x"));
        assert_eq!(tex.width, CANVAS_SIZE);
        assert_eq!(tex.height, CANVAS_SIZE);
        assert_eq!(tex.data.len(), (CANVAS_SIZE * CANVAS_SIZE * 4) as usize);
    }

    #[test]
    fn test_text_leaves_ink_on_canvas() {
        let rasterizer = TextRasterizer::new().unwrap();
        let tex = rasterizer.rasterize(&PrintText::from_input("INK"));
        // Some pixel must be darker than the white background
        assert!(tex.data.chunks_exact(4).any(|px| px[0] < 255));
    }

    #[test]
    fn test_empty_text_is_blank_canvas() {
        let rasterizer = TextRasterizer::new().unwrap();
        let tex = rasterizer.rasterize(&PrintText::from_input(""));
        assert!(tex.data.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_different_text_differs() {
        let rasterizer = TextRasterizer::new().unwrap();
        let a = rasterizer.rasterize(&PrintText::from_input("AAA"));
        let b = rasterizer.rasterize(&PrintText::from_input("BBB"));
        assert_ne!(a, b);
    }
}
