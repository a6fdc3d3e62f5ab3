//! Rotating 3D product surface
//!
//! Owns the mesh load state machine and the continuously advancing rotation.
//! Asset loads resolve on a background thread; a completion is applied only if
//! its generation token still matches the latest request, so a product change
//! fired mid-load can never attach the superseded mesh.

use crate::assets::{AssetLoader, LoadResult};
use crate::config::ProductType;
use crate::mesh::GarmentMesh;
use crate::scale::DerivedScale;
use crate::state::{DerivedSnapshot, StateDelta};
use crate::texture::{RenderTexture, TextureCompositor};

use super::{ProductSurface, SurfaceKind};

/// Rotation advance per rendered frame, in radians
pub const ROTATION_STEP: f32 = 0.01;

/// Fallback box dimensions (width, height, depth)
const FALLBACK_BOX: (f32, f32, f32) = (2.0, 2.5, 1.0);

/// Mesh load state
#[derive(Debug)]
pub enum SurfaceState {
    /// No product requested yet
    Uninitialized,
    /// A load is in flight for this product
    Loading {
        product: ProductType,
        generation: u64,
    },
    /// The product asset is attached
    Ready(GarmentMesh),
    /// The asset failed to load; the primitive box stands in
    Fallback(GarmentMesh),
}

impl SurfaceState {
    /// The attached mesh, if any
    pub fn mesh(&self) -> Option<&GarmentMesh> {
        match self {
            SurfaceState::Ready(mesh) | SurfaceState::Fallback(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceState::Uninitialized => "uninitialized",
            SurfaceState::Loading { .. } => "loading",
            SurfaceState::Ready(_) => "ready",
            SurfaceState::Fallback(_) => "fallback",
        }
    }
}

/// The rotating 3D product view
pub struct Mesh3DSurface {
    loader: AssetLoader,
    state: SurfaceState,
    scale: DerivedScale,
    texture: Option<RenderTexture>,
    rotation: f32,
    mounted: bool,
    mesh_revision: u64,
    texture_revision: u64,
}

impl Mesh3DSurface {
    /// Create the surface over a mesh loader
    pub fn new(loader: AssetLoader) -> Self {
        Self {
            loader,
            state: SurfaceState::Uninitialized,
            scale: DerivedScale::default(),
            texture: None,
            rotation: 0.0,
            mounted: false,
            mesh_revision: 0,
            texture_revision: 0,
        }
    }

    /// Request the mesh for a product, discarding whatever is attached
    pub fn set_product(&mut self, product: ProductType) {
        let generation = self.loader.request(product);
        self.state = SurfaceState::Loading {
            product,
            generation,
        };
        self.mesh_revision += 1;
    }

    /// Apply a completed load
    ///
    /// Results from superseded requests are discarded here; only the latest
    /// generation may attach a mesh.
    pub fn handle_load_result(&mut self, result: LoadResult) {
        if result.generation != self.loader.current_generation() {
            log::debug!(
                "Discarding stale mesh load for {:?} (generation {} != {})",
                result.product,
                result.generation,
                self.loader.current_generation()
            );
            return;
        }

        match result.outcome {
            Ok(data) => {
                log::info!("Attached mesh for {:?}", result.product);
                self.state = SurfaceState::Ready(GarmentMesh::from_data(&data));
            }
            Err(e) => {
                log::warn!(
                    "Mesh load failed for {:?}, using fallback box: {}",
                    result.product,
                    e
                );
                let (w, h, d) = FALLBACK_BOX;
                self.state = SurfaceState::Fallback(GarmentMesh::fallback_box(w, h, d));
            }
        }
        self.mesh_revision += 1;
    }

    /// Drain completed loads from the background thread
    pub fn poll_loader(&mut self) {
        while let Some(result) = self.loader.poll() {
            self.handle_load_result(result);
        }
    }

    /// Re-apply scale without reloading
    pub fn set_scale(&mut self, scale: DerivedScale) {
        self.scale = scale;
    }

    /// Re-apply the texture without reloading
    ///
    /// `None` reverts every paintable part to the untextured default material.
    pub fn set_texture(&mut self, texture: Option<RenderTexture>) {
        self.texture = texture;
        self.texture_revision += 1;
    }

    /// Mount or unmount the surface
    ///
    /// The rotation tick runs only while mounted; unmounting pauses the
    /// animation without resetting rotation or any other computed state.
    pub fn set_mounted(&mut self, mounted: bool) {
        if self.mounted != mounted {
            log::debug!("3D surface {}", if mounted { "mounted" } else { "unmounted" });
        }
        self.mounted = mounted;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Advance the rotation by one frame step, while mounted
    ///
    /// Data updates never stop or reset the rotation; an absent mesh is
    /// tolerated (there is simply nothing to show yet).
    pub fn tick(&mut self) {
        if !self.mounted {
            return;
        }
        self.rotation += ROTATION_STEP;
        if self.rotation > std::f32::consts::TAU {
            self.rotation -= std::f32::consts::TAU;
        }
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub fn mesh(&self) -> Option<&GarmentMesh> {
        self.state.mesh()
    }

    pub fn scale(&self) -> DerivedScale {
        self.scale
    }

    pub fn texture(&self) -> Option<&RenderTexture> {
        self.texture.as_ref()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Bumped whenever the attached mesh changes; the renderer re-uploads
    /// vertex data when it observes a new value
    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    /// Bumped whenever the texture changes
    pub fn texture_revision(&self) -> u64 {
        self.texture_revision
    }
}

impl ProductSurface for Mesh3DSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Mesh3D
    }

    fn apply(
        &mut self,
        snapshot: &DerivedSnapshot,
        delta: StateDelta,
        compositor: &TextureCompositor,
    ) {
        if delta.product {
            self.set_product(snapshot.product);
        }
        if delta.scale {
            self.set_scale(snapshot.scale);
        }
        if delta.artwork {
            // Single-texture path: image-wins precedence via the compositor
            self.set_texture(compositor.compose(&snapshot.artwork));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MapAssetSource;
    use crate::mesh::MeshData;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    fn sample_mesh() -> MeshData {
        MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
        }
    }

    fn surface_with(meshes: &[ProductType]) -> Mesh3DSurface {
        let mut map = HashMap::new();
        for &p in meshes {
            map.insert(p, sample_mesh());
        }
        Mesh3DSurface::new(AssetLoader::new(MapAssetSource::new(map)))
    }

    fn poll_until_settled(surface: &mut Mesh3DSurface) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            surface.poll_loader();
            if !matches!(surface.state(), SurfaceState::Loading { .. }) {
                return;
            }
            assert!(Instant::now() < deadline, "load never settled");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_load_success_reaches_ready() {
        let mut surface = surface_with(&[ProductType::Tshirt]);
        surface.set_product(ProductType::Tshirt);
        poll_until_settled(&mut surface);
        assert!(matches!(surface.state(), SurfaceState::Ready(_)));
        assert_eq!(surface.mesh().unwrap().vertex_count(), 3);
    }

    #[test]
    fn test_missing_cap_falls_back_with_scale_and_texture() {
        let mut surface = surface_with(&[ProductType::Tshirt]);
        let scale = crate::scale::compute_scale(200.0, 100.0, crate::config::Build::Big);
        surface.set_scale(scale);
        surface.set_texture(Some(RenderTexture::solid(4, 4, [9, 9, 9, 255])));

        surface.set_product(ProductType::Cap);
        poll_until_settled(&mut surface);

        assert!(matches!(surface.state(), SurfaceState::Fallback(_)));
        let mesh = surface.mesh().expect("fallback mesh attached");
        assert!(mesh.vertex_count() > 0);
        // Scale and texture still apply to the fallback
        assert_eq!(surface.scale(), scale);
        assert!(surface.texture().is_some());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut surface = surface_with(&[ProductType::Tshirt, ProductType::Hoodie]);
        surface.set_product(ProductType::Tshirt);
        let stale_generation = match surface.state() {
            SurfaceState::Loading { generation, .. } => *generation,
            other => panic!("expected loading, got {}", other.name()),
        };
        // Product changes before the first load resolves
        surface.set_product(ProductType::Hoodie);

        // The tshirt load resolving late must not attach
        surface.handle_load_result(LoadResult {
            product: ProductType::Tshirt,
            generation: stale_generation,
            outcome: Ok(sample_mesh()),
        });
        assert!(matches!(
            surface.state(),
            SurfaceState::Loading { product: ProductType::Hoodie, .. }
        ));

        // The surface ends in the state for the final product
        poll_until_settled(&mut surface);
        assert!(matches!(surface.state(), SurfaceState::Ready(_)));
    }

    #[test]
    fn test_rotation_survives_data_updates() {
        let mut surface = surface_with(&[]);
        surface.set_mounted(true);
        for _ in 0..10 {
            surface.tick();
        }
        let rotation = surface.rotation();
        assert!((rotation - 10.0 * ROTATION_STEP).abs() < 1e-6);

        // Data updates neither stop nor reset the rotation
        surface.set_scale(DerivedScale::default());
        surface.set_texture(None);
        surface.set_product(ProductType::Cap);
        surface.tick();
        assert!(surface.rotation() > rotation);
    }

    #[test]
    fn test_tick_with_absent_mesh_is_harmless() {
        let mut surface = surface_with(&[]);
        surface.set_mounted(true);
        assert!(surface.mesh().is_none());
        surface.tick();
        assert!(surface.rotation() > 0.0);
    }

    #[test]
    fn test_unmounted_tick_pauses_without_reset() {
        let mut surface = surface_with(&[]);
        surface.set_mounted(true);
        surface.tick();
        let rotation = surface.rotation();

        surface.set_mounted(false);
        surface.tick();
        assert_eq!(surface.rotation(), rotation);

        // Remounting resumes from where it paused
        surface.set_mounted(true);
        surface.tick();
        assert!(surface.rotation() > rotation);
    }

    #[test]
    fn test_revisions_bump_on_changes() {
        let mut surface = surface_with(&[]);
        let mesh_rev = surface.mesh_revision();
        let tex_rev = surface.texture_revision();
        surface.set_product(ProductType::Tshirt);
        surface.set_texture(None);
        assert!(surface.mesh_revision() > mesh_rev);
        assert!(surface.texture_revision() > tex_rev);
    }
}
