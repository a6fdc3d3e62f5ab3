//! Mesh asset loading
//!
//! Resolves product meshes from an external asset store and loads them on a
//! background thread so the UI never blocks. Each request carries a generation
//! token; a completion whose generation no longer matches the latest request
//! is stale and must be discarded by the consumer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use anyhow::Context;

use crate::config::ProductType;
use crate::mesh::MeshData;

/// External mesh store: one request, one success-or-failure response
pub trait AssetSource: Send + 'static {
    fn load_mesh(&self, product: ProductType) -> anyhow::Result<MeshData>;
}

/// Filesystem asset source
///
/// Looks up `manifest.json` (asset key -> file name) under the root directory
/// and reads bincode-encoded [`MeshData`] payloads.
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default model directory next to the executable's working directory
    pub fn default_dir() -> Self {
        Self::new("models")
    }

    fn manifest(&self) -> anyhow::Result<HashMap<String, String>> {
        let path = self.root.join("manifest.json");
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading asset manifest {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing asset manifest {:?}", path))
    }

    fn read_mesh(&self, path: &Path) -> anyhow::Result<MeshData> {
        let raw = std::fs::read(path).with_context(|| format!("reading mesh asset {:?}", path))?;
        let data: MeshData =
            bincode::deserialize(&raw).with_context(|| format!("decoding mesh asset {:?}", path))?;
        data.validate()
            .with_context(|| format!("validating mesh asset {:?}", path))?;
        Ok(data)
    }
}

impl AssetSource for DirAssetSource {
    fn load_mesh(&self, product: ProductType) -> anyhow::Result<MeshData> {
        let manifest = self.manifest()?;
        let file = manifest
            .get(product.asset_key())
            .with_context(|| format!("no manifest entry for {:?}", product))?;
        self.read_mesh(&self.root.join(file))
    }
}

/// In-memory asset source, used by tests and demos
pub struct MapAssetSource {
    meshes: HashMap<ProductType, MeshData>,
}

impl MapAssetSource {
    pub fn new(meshes: HashMap<ProductType, MeshData>) -> Self {
        Self { meshes }
    }
}

impl AssetSource for MapAssetSource {
    fn load_mesh(&self, product: ProductType) -> anyhow::Result<MeshData> {
        self.meshes
            .get(&product)
            .cloned()
            .with_context(|| format!("no mesh registered for {:?}", product))
    }
}

struct LoadRequest {
    product: ProductType,
    generation: u64,
}

/// Completed load, tagged with the generation of the request that caused it
pub struct LoadResult {
    pub product: ProductType,
    pub generation: u64,
    pub outcome: anyhow::Result<MeshData>,
}

/// Background mesh loader with stale-result tagging
pub struct AssetLoader {
    request_tx: Sender<LoadRequest>,
    result_rx: Receiver<LoadResult>,
    generation: u64,
}

impl AssetLoader {
    /// Spawn the loader thread over the given source
    pub fn new(source: impl AssetSource) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel::<LoadResult>();

        thread::Builder::new()
            .name("mesh-loader".into())
            .spawn(move || {
                Self::loader_thread(source, request_rx, result_tx);
            })
            .expect("Failed to spawn mesh loader thread");

        Self {
            request_tx,
            result_rx,
            generation: 0,
        }
    }

    fn loader_thread(
        source: impl AssetSource,
        request_rx: Receiver<LoadRequest>,
        result_tx: Sender<LoadResult>,
    ) {
        while let Ok(request) = request_rx.recv() {
            let outcome = source.load_mesh(request.product);
            let result = LoadResult {
                product: request.product,
                generation: request.generation,
                outcome,
            };
            if result_tx.send(result).is_err() {
                // Consumer dropped, exit
                break;
            }
        }
    }

    /// Issue a load request, superseding any outstanding one
    ///
    /// Returns the new generation token; only a result carrying this token is
    /// current.
    pub fn request(&mut self, product: ProductType) -> u64 {
        self.generation += 1;
        log::info!(
            "Requesting mesh for {:?} (generation {})",
            product,
            self.generation
        );
        if self.request_tx
            .send(LoadRequest {
                product,
                generation: self.generation,
            })
            .is_err()
        {
            log::error!("Mesh loader thread is gone, load request dropped");
        }
        self.generation
    }

    /// Latest issued generation
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Poll for a completed load without blocking
    pub fn poll(&mut self) -> Option<LoadResult> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}
