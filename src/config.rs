//! Product configuration types
//!
//! Body measurements, build category, and product selection. Input widgets are
//! expected to clamp values into the declared ranges; the reducer clamps again
//! defensively so out-of-range input can never reach the scale engine.

use serde::{Deserialize, Serialize};

/// Valid height range in centimeters
pub const HEIGHT_RANGE: std::ops::RangeInclusive<f32> = 100.0..=250.0;
/// Valid weight range in kilograms
pub const WEIGHT_RANGE: std::ops::RangeInclusive<f32> = 30.0..=200.0;

/// Qualitative body-shape category, used as a secondary scale multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Build {
    /// Narrower than regular
    Lean,
    /// No adjustment
    Reg,
    /// Broader shoulders
    #[default]
    Athletic,
    /// Widest fit
    Big,
}

impl Build {
    /// Get all build categories for iteration
    pub fn all() -> &'static [Build] {
        &[Build::Lean, Build::Reg, Build::Athletic, Build::Big]
    }

    /// Get human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Build::Lean => "Lean",
            Build::Reg => "Reg",
            Build::Athletic => "Athletic",
            Build::Big => "Big",
        }
    }
}

/// Printable product variant; keys the mesh asset to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductType {
    #[default]
    Tshirt,
    Hoodie,
    Sleevie,
    Cap,
}

impl ProductType {
    /// Get all product types for iteration
    pub fn all() -> &'static [ProductType] {
        &[
            ProductType::Tshirt,
            ProductType::Hoodie,
            ProductType::Sleevie,
            ProductType::Cap,
        ]
    }

    /// Get human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProductType::Tshirt => "T-shirt",
            ProductType::Hoodie => "Hoodie",
            ProductType::Sleevie => "Sleeve",
            ProductType::Cap => "Cap",
        }
    }

    /// Asset key used to resolve the mesh file
    pub fn asset_key(&self) -> &'static str {
        match self {
            ProductType::Tshirt => "tshirt",
            ProductType::Hoodie => "hoodie",
            ProductType::Sleevie => "sleevie",
            ProductType::Cap => "cap",
        }
    }
}

/// Current body measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Height in centimeters, within [100, 250]
    #[serde(rename = "height", default = "default_height")]
    pub height: f32,
    /// Weight in kilograms, within [30, 200]
    #[serde(rename = "weight", default = "default_weight")]
    pub weight: f32,
    /// Build category
    #[serde(rename = "build", default)]
    pub build: Build,
}

fn default_height() -> f32 {
    180.0
}

fn default_weight() -> f32 {
    80.0
}

impl Default for Measurements {
    fn default() -> Self {
        Self {
            height: default_height(),
            weight: default_weight(),
            build: Build::default(),
        }
    }
}

impl Measurements {
    /// Clamp both values into their declared ranges
    ///
    /// Non-finite input is left untouched here; the scale engine treats it as
    /// unset and defaults that axis to 1.0.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32, range: &std::ops::RangeInclusive<f32>| {
            if v.is_finite() {
                v.clamp(*range.start(), *range.end())
            } else {
                v
            }
        };
        Self {
            height: clamp(self.height, &HEIGHT_RANGE),
            weight: clamp(self.weight, &WEIGHT_RANGE),
            build: self.build,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let m = Measurements::default();
        assert_eq!(m.height, 180.0);
        assert_eq!(m.weight, 80.0);
        assert_eq!(m.build, Build::Athletic);
    }

    #[test]
    fn test_clamped() {
        let m = Measurements {
            height: 500.0,
            weight: 1.0,
            build: Build::Reg,
        };
        let c = m.clamped();
        assert_eq!(c.height, 250.0);
        assert_eq!(c.weight, 30.0);
    }

    #[test]
    fn test_asset_keys() {
        assert_eq!(ProductType::Tshirt.asset_key(), "tshirt");
        assert_eq!(ProductType::Cap.asset_key(), "cap");
        assert_eq!(ProductType::all().len(), 4);
    }
}
