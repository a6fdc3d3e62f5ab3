//! Configurator state container
//!
//! All user input flows through discrete [`ConfigEvent`]s applied by a
//! reducer. Each application reports which derived values went stale via a
//! [`StateDelta`], and [`ConfiguratorState::snapshot`] produces the immutable
//! derived state that both product surfaces consume — identical inputs on both
//! sides is what keeps the two views visually consistent.

use std::sync::Arc;

use crate::artwork::{ArtworkInput, ArtworkState, PrintText};
use crate::config::{Build, Measurements, ProductType};
use crate::layout::LayoutMode;
use crate::scale::{scale_for, DerivedScale};

/// A discrete input event
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    SetHeight(f32),
    SetWeight(f32),
    SetBuild(Build),
    SetProduct(ProductType),
    /// Wholesale replacement of the uploaded image bytes
    SetImage(Vec<u8>),
    ClearImage,
    /// Wholesale replacement of the print text from raw textarea input
    SetText(String),
    SetLayout(LayoutMode),
}

/// Which derived values an event invalidated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateDelta {
    pub scale: bool,
    pub artwork: bool,
    pub product: bool,
    pub layout: bool,
}

impl StateDelta {
    /// Delta that invalidates everything (initial application)
    pub fn all() -> Self {
        Self {
            scale: true,
            artwork: true,
            product: true,
            layout: true,
        }
    }

    pub fn any(&self) -> bool {
        self.scale || self.artwork || self.product || self.layout
    }
}

/// Session-lived configuration state
#[derive(Debug, Clone, Default)]
pub struct ConfiguratorState {
    pub measurements: Measurements,
    pub product: ProductType,
    pub artwork: ArtworkState,
    pub layout: LayoutMode,
}

/// Immutable derived state consumed by the surfaces
///
/// Recomputed wholesale from the inputs; nothing here has independent
/// identity, so stale values cannot outlive an input change.
#[derive(Debug, Clone)]
pub struct DerivedSnapshot {
    pub scale: DerivedScale,
    /// Active artwork for the single-texture (3D) path, image-wins precedence
    pub artwork: ArtworkInput,
    /// Raw image channel for surfaces that present the channels independently
    pub image: Option<Arc<Vec<u8>>>,
    /// Raw text channel, already truncated to 3 lines
    pub text: PrintText,
    pub product: ProductType,
}

impl ConfiguratorState {
    /// Apply one input event, reporting what went stale
    ///
    /// Measurements are clamped into their declared ranges here as a defensive
    /// backstop; widgets are expected to clamp first.
    pub fn apply(&mut self, event: ConfigEvent) -> StateDelta {
        let mut delta = StateDelta::default();
        match event {
            ConfigEvent::SetHeight(height) => {
                self.measurements.height = height;
                self.measurements = self.measurements.clamped();
                delta.scale = true;
            }
            ConfigEvent::SetWeight(weight) => {
                self.measurements.weight = weight;
                self.measurements = self.measurements.clamped();
                delta.scale = true;
            }
            ConfigEvent::SetBuild(build) => {
                self.measurements.build = build;
                delta.scale = true;
            }
            ConfigEvent::SetProduct(product) => {
                if self.product != product {
                    self.product = product;
                    delta.product = true;
                }
            }
            ConfigEvent::SetImage(bytes) => {
                log::info!("Artwork image replaced ({} bytes)", bytes.len());
                self.artwork.image = Some(Arc::new(bytes));
                delta.artwork = true;
            }
            ConfigEvent::ClearImage => {
                self.artwork.image = None;
                delta.artwork = true;
            }
            ConfigEvent::SetText(input) => {
                self.artwork.text = PrintText::from_input(&input);
                delta.artwork = true;
            }
            ConfigEvent::SetLayout(layout) => {
                if self.layout != layout {
                    self.layout = layout;
                    delta.layout = true;
                }
            }
        }
        delta
    }

    /// Produce the derived snapshot for the current inputs
    pub fn snapshot(&self) -> DerivedSnapshot {
        DerivedSnapshot {
            scale: scale_for(&self.measurements),
            artwork: self.artwork.active(),
            image: self.artwork.image.clone(),
            text: self.artwork.text.clone(),
            product: self.product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_events_invalidate_scale() {
        let mut state = ConfiguratorState::default();
        let delta = state.apply(ConfigEvent::SetHeight(200.0));
        assert!(delta.scale && !delta.artwork && !delta.product);
        assert_eq!(state.measurements.height, 200.0);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let mut state = ConfiguratorState::default();
        state.apply(ConfigEvent::SetHeight(9999.0));
        state.apply(ConfigEvent::SetWeight(-5.0));
        assert_eq!(state.measurements.height, 250.0);
        assert_eq!(state.measurements.weight, 30.0);
    }

    #[test]
    fn test_product_change_detection() {
        let mut state = ConfiguratorState::default();
        // Default product re-set: no change
        assert!(!state.apply(ConfigEvent::SetProduct(ProductType::Tshirt)).any());
        let delta = state.apply(ConfigEvent::SetProduct(ProductType::Cap));
        assert!(delta.product);
    }

    #[test]
    fn test_image_does_not_clear_text() {
        let mut state = ConfiguratorState::default();
        state.apply(ConfigEvent::SetText("keep me".into()));
        state.apply(ConfigEvent::SetImage(vec![1, 2, 3]));
        assert!(!state.artwork.text.is_empty());
        assert!(state.artwork.image.is_some());
        // 3D path prefers the image
        assert!(matches!(state.snapshot().artwork, ArtworkInput::Image(_)));
    }

    #[test]
    fn test_snapshot_recomputes_scale() {
        let mut state = ConfiguratorState::default();
        state.apply(ConfigEvent::SetBuild(Build::Reg));
        state.apply(ConfigEvent::SetHeight(180.0));
        state.apply(ConfigEvent::SetWeight(80.0));
        let snap = state.snapshot();
        assert_eq!(snap.scale, DerivedScale::default());

        state.apply(ConfigEvent::SetBuild(Build::Big));
        let snap = state.snapshot();
        assert!((snap.scale.x - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_text_is_truncated_in_snapshot() {
        let mut state = ConfiguratorState::default();
        state.apply(ConfigEvent::SetText("1\n2\n3\n4".into()));
        assert_eq!(state.snapshot().text.lines().len(), 3);
    }
}
