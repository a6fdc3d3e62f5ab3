//! Scale transform engine
//!
//! Derives the non-uniform mesh scale from body measurements. This is a visual
//! approximation with fixed reference constants, not an anthropometric model:
//! height and weight act as direct multipliers against a 180 cm / 80 kg
//! baseline, and the build category widens or narrows the X axis only.

use crate::config::{Build, Measurements};

/// Reference height in centimeters mapping to scale 1.0
pub const REFERENCE_HEIGHT: f32 = 180.0;
/// Reference weight in kilograms mapping to scale 1.0
pub const REFERENCE_WEIGHT: f32 = 80.0;

/// Non-uniform scale applied to the garment mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for DerivedScale {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

impl DerivedScale {
    /// As a glam vector for matrix construction
    pub fn to_vec3(self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }
}

/// Compute the mesh scale from measurements
///
/// Pure and deterministic: identical inputs always yield identical output.
/// A zero or non-finite measurement is treated as unset and defaults that
/// axis to 1.0. Depth is never deformed.
pub fn compute_scale(height: f32, weight: f32, build: Build) -> DerivedScale {
    let y = if height.is_finite() && height != 0.0 {
        height / REFERENCE_HEIGHT
    } else {
        1.0
    };
    let mut x = if weight.is_finite() && weight != 0.0 {
        weight / REFERENCE_WEIGHT
    } else {
        1.0
    };

    x *= match build {
        Build::Lean => 0.9,
        Build::Reg => 1.0,
        Build::Athletic => 1.1,
        Build::Big => 1.2,
    };

    DerivedScale { x, y, z: 1.0 }
}

/// Convenience wrapper taking the measurement struct
pub fn scale_for(measurements: &Measurements) -> DerivedScale {
    compute_scale(measurements.height, measurements.weight, measurements.build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_reg() {
        let s = compute_scale(180.0, 80.0, Build::Reg);
        assert_eq!(s.x, 1.0);
        assert_eq!(s.y, 1.0);
        assert_eq!(s.z, 1.0);
    }

    #[test]
    fn test_big_multiplier() {
        let s = compute_scale(180.0, 80.0, Build::Big);
        assert!((s.x - 1.2).abs() < 1e-6);
        assert_eq!(s.y, 1.0);
    }

    #[test]
    fn test_lean_tall() {
        let s = compute_scale(360.0, 80.0, Build::Lean);
        assert!((s.x - 0.9).abs() < 1e-6);
        assert_eq!(s.y, 2.0);
    }

    #[test]
    fn test_athletic_multiplier() {
        let s = compute_scale(180.0, 80.0, Build::Athletic);
        assert!((s.x - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_unset_defaults_to_one() {
        let s = compute_scale(0.0, 0.0, Build::Reg);
        assert_eq!(s.x, 1.0);
        assert_eq!(s.y, 1.0);

        let s = compute_scale(f32::NAN, f32::INFINITY, Build::Reg);
        assert_eq!(s.x, 1.0);
        assert_eq!(s.y, 1.0);
    }

    #[test]
    fn test_deterministic_over_range() {
        for h in [100.0f32, 147.0, 180.0, 250.0] {
            for w in [30.0f32, 64.0, 80.0, 200.0] {
                for &b in Build::all() {
                    assert_eq!(compute_scale(h, w, b), compute_scale(h, w, b));
                }
            }
        }
    }

    #[test]
    fn test_depth_never_deformed() {
        for &b in Build::all() {
            assert_eq!(compute_scale(250.0, 200.0, b).z, 1.0);
        }
    }
}
