//! GPU rendering for the 3D product view

mod viewer3d;

pub use viewer3d::GarmentRenderer;
