//! Flat 2D mockup surface
//!
//! Shows the uploaded artwork as a flat image with the print text drawn as an
//! overlay at a fixed anchor. Unlike the 3D surface this view does NOT apply
//! the image-wins precedence rule: image and text are presented
//! simultaneously.

use crate::artwork::PrintText;
use crate::state::{DerivedSnapshot, StateDelta};
use crate::texture::{RenderTexture, TextureCompositor};

use super::{ProductSurface, SurfaceKind};

/// Overlay anchor as a fraction of the view, independent of the image
pub const OVERLAY_ANCHOR: (f32, f32) = (0.4, 0.4);

/// What the flat surface currently presents
#[derive(Debug, PartialEq)]
pub struct FlatView<'a> {
    /// Decoded artwork image, or `None` for the "no image" placeholder
    pub texture: Option<&'a RenderTexture>,
    /// Print text overlay, drawn even when an image is shown
    pub overlay: Option<&'a PrintText>,
}

/// The flat mockup view
#[derive(Default)]
pub struct FlatPreviewSurface {
    texture: Option<RenderTexture>,
    text: PrintText,
    texture_revision: u64,
}

impl FlatPreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current presentation
    pub fn view(&self) -> FlatView<'_> {
        FlatView {
            texture: self.texture.as_ref(),
            overlay: if self.text.is_empty() {
                None
            } else {
                Some(&self.text)
            },
        }
    }

    /// Bumped whenever the image texture changes
    pub fn texture_revision(&self) -> u64 {
        self.texture_revision
    }
}

impl ProductSurface for FlatPreviewSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::FlatPreview
    }

    fn apply(
        &mut self,
        snapshot: &DerivedSnapshot,
        delta: StateDelta,
        compositor: &TextureCompositor,
    ) {
        if !delta.artwork {
            return;
        }

        // Independent decode: this surface owns its texture, sharing nothing
        // mutable with the 3D view.
        self.texture = snapshot.image.as_deref().and_then(|bytes| {
            match compositor.decode_image(bytes) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    log::warn!("Flat preview decode failed, showing placeholder: {}", e);
                    None
                }
            }
        });
        self.text = snapshot.text.clone();
        self.texture_revision += 1;
    }
}
