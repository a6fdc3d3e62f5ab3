//! Texture compositing
//!
//! Produces the flat raster applied to the product surfaces: uploaded artwork
//! is decoded and passed through untouched, typed print text is rasterized on
//! a fixed-size canvas. When both are present the image wins; this precedence
//! is the 3D path's policy only (the flat preview shows both, see
//! `surface::flat`).

mod text;

pub use text::TextRasterizer;

use crate::artwork::ArtworkInput;
use thiserror::Error;

/// Errors from texture generation
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode artwork image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("no usable glyph font available")]
    FontUnavailable,
}

/// A generated or decoded RGBA8 raster
///
/// Owned exclusively by the surface that requested it; surfaces never share a
/// mutable texture, each computes its own from the same logical inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTexture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row major
    pub data: Vec<u8>,
}

impl RenderTexture {
    /// Wrap a decoded image buffer
    pub fn from_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    /// Solid single-color texture (used as the untextured default material)
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

/// Composites artwork input into render textures
pub struct TextureCompositor {
    rasterizer: TextRasterizer,
}

impl TextureCompositor {
    /// Create a compositor with the embedded glyph font
    pub fn new() -> Result<Self, TextureError> {
        Ok(Self {
            rasterizer: TextRasterizer::new()?,
        })
    }

    /// Decode uploaded image bytes into a texture, pass-through
    ///
    /// No resizing, centering, or format validation happens here; the bytes
    /// are decoded as-is.
    pub fn decode_image(&self, bytes: &[u8]) -> Result<RenderTexture, TextureError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(RenderTexture::from_image(decoded.to_rgba8()))
    }

    /// Produce the texture for the active artwork, if any
    ///
    /// Malformed image bytes degrade to "no texture" rather than propagating,
    /// mirroring the asset loader's fallback stance: the preview stays
    /// interactive, just unprinted.
    pub fn compose(&self, artwork: &ArtworkInput) -> Option<RenderTexture> {
        match artwork {
            ArtworkInput::Image(bytes) => match self.decode_image(bytes) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    log::warn!("Artwork decode failed, showing no image: {}", e);
                    None
                }
            },
            ArtworkInput::Text(text) => Some(self.rasterizer.rasterize(text)),
            ArtworkInput::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::{ArtworkState, PrintText};
    use std::sync::Arc;

    fn png_bytes() -> Vec<u8> {
        // Encode a tiny 2x2 image so the decode path runs on real bytes
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_pass_through() {
        let compositor = TextureCompositor::new().unwrap();
        let tex = compositor.decode_image(&png_bytes()).unwrap();
        assert_eq!(tex.width, 2);
        assert_eq!(tex.height, 2);
        assert_eq!(&tex.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_malformed_bytes_degrade_to_none() {
        let compositor = TextureCompositor::new().unwrap();
        let artwork = ArtworkInput::Image(Arc::new(vec![0xde, 0xad, 0xbe, 0xef]));
        assert!(compositor.compose(&artwork).is_none());
    }

    #[test]
    fn test_none_produces_no_texture() {
        let compositor = TextureCompositor::new().unwrap();
        assert!(compositor.compose(&ArtworkInput::None).is_none());
    }

    #[test]
    fn test_image_wins_over_text() {
        let compositor = TextureCompositor::new().unwrap();
        let state = ArtworkState {
            image: Some(Arc::new(png_bytes())),
            text: PrintText::from_input("PRINT ME"),
        };

        let composed = compositor.compose(&state.active()).unwrap();
        let image_only = compositor.decode_image(&png_bytes()).unwrap();
        let text_only = compositor
            .compose(&ArtworkInput::Text(PrintText::from_input("PRINT ME")))
            .unwrap();

        assert_eq!(composed, image_only);
        assert_ne!(composed, text_only);
    }

    #[test]
    fn test_solid_texture() {
        let tex = RenderTexture::solid(4, 4, [255, 255, 255, 255]);
        assert_eq!(tex.data.len(), 4 * 4 * 4);
        assert!(tex.data.iter().all(|&b| b == 255));
    }
}
