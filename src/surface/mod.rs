//! Product surfaces
//!
//! The two concrete presentations of the configured product. Both consume the
//! same [`DerivedSnapshot`](crate::state::DerivedSnapshot) so they can never
//! disagree about the underlying configuration, while each owns its render
//! texture independently.

mod flat;
mod mesh3d;

pub use flat::{FlatPreviewSurface, FlatView, OVERLAY_ANCHOR};
pub use mesh3d::{Mesh3DSurface, SurfaceState, ROTATION_STEP};

use crate::state::{DerivedSnapshot, StateDelta};
use crate::texture::TextureCompositor;

/// Identifies a surface implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Mesh3D,
    FlatPreview,
}

/// A view of the configured product
pub trait ProductSurface {
    fn kind(&self) -> SurfaceKind;

    /// Consume a derived snapshot, recomputing whatever the delta invalidated
    fn apply(
        &mut self,
        snapshot: &DerivedSnapshot,
        delta: StateDelta,
        compositor: &TextureCompositor,
    );
}
