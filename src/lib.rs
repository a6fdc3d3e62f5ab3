//! Garment Viewer Library
//!
//! A parametric apparel product configurator: body measurements, a build
//! category, uploaded artwork, and print text drive a rotating 3D preview and
//! a flat 2D mockup from one shared derived state.

pub mod app;
pub mod artwork;
pub mod assets;
pub mod config;
pub mod layout;
pub mod mesh;
pub mod render;
pub mod scale;
pub mod state;
pub mod surface;
pub mod texture;

// Re-export commonly used types
pub use app::GarmentViewerApp;
pub use artwork::{ArtworkInput, ArtworkState, PrintText};
pub use assets::{AssetLoader, AssetSource, DirAssetSource};
pub use config::{Build, Measurements, ProductType};
pub use layout::{LayoutCoordinator, LayoutMode, SurfaceMounts};
pub use mesh::{GarmentMesh, MeshData};
pub use scale::{compute_scale, DerivedScale};
pub use state::{ConfigEvent, ConfiguratorState, DerivedSnapshot, StateDelta};
pub use surface::{FlatPreviewSurface, Mesh3DSurface, ProductSurface, SurfaceState};
pub use texture::{RenderTexture, TextureCompositor};
