//! Layout selection
//!
//! Decides which product surfaces are mounted. Pure visibility control: no
//! visualization logic lives here, and surfaces keep their computed state
//! while unmounted.

use serde::{Deserialize, Serialize};

/// Display mode for the preview area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Rotating 3D view only
    ThreeD,
    /// Flat mockup only
    Preview,
    /// Both views concurrently
    #[default]
    SideBySide,
}

impl LayoutMode {
    /// Get all layout modes for iteration
    pub fn all() -> &'static [LayoutMode] {
        &[LayoutMode::ThreeD, LayoutMode::Preview, LayoutMode::SideBySide]
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutMode::ThreeD => "3D View Only",
            LayoutMode::Preview => "Preview Only",
            LayoutMode::SideBySide => "Side-by-Side",
        }
    }
}

/// Which surfaces are currently mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceMounts {
    pub mesh3d: bool,
    pub flat: bool,
}

/// Maps a layout mode to the mounted surface set
pub struct LayoutCoordinator;

impl LayoutCoordinator {
    pub fn mounts(mode: LayoutMode) -> SurfaceMounts {
        match mode {
            LayoutMode::ThreeD => SurfaceMounts {
                mesh3d: true,
                flat: false,
            },
            LayoutMode::Preview => SurfaceMounts {
                mesh3d: false,
                flat: true,
            },
            LayoutMode::SideBySide => SurfaceMounts {
                mesh3d: true,
                flat: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mounts_per_mode() {
        assert_eq!(
            LayoutCoordinator::mounts(LayoutMode::ThreeD),
            SurfaceMounts {
                mesh3d: true,
                flat: false
            }
        );
        assert_eq!(
            LayoutCoordinator::mounts(LayoutMode::Preview),
            SurfaceMounts {
                mesh3d: false,
                flat: true
            }
        );
        assert_eq!(
            LayoutCoordinator::mounts(LayoutMode::SideBySide),
            SurfaceMounts {
                mesh3d: true,
                flat: true
            }
        );
    }

    #[test]
    fn test_default_is_side_by_side() {
        assert_eq!(LayoutMode::default(), LayoutMode::SideBySide);
    }
}
