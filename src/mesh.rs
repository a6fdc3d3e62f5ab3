//! Garment mesh data
//!
//! Vertex/index data for the 3D product surface, the serialized asset payload,
//! and the primitive fallback box substituted when an asset fails to load.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Vertex for the 3D garment mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GarmentVertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Texture coordinates
    pub uv: [f32; 2],
    /// Normal vector (for lighting)
    pub normal: [f32; 3],
}

impl GarmentVertex {
    /// Size of vertex in bytes
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Vertex buffer layout for wgpu
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // uv
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // normal
                wgpu::VertexAttribute {
                    offset: 20,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Serialized mesh asset payload (bincode on disk)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Validate attribute counts and index bounds
    pub fn validate(&self) -> anyhow::Result<()> {
        let n = self.positions.len();
        anyhow::ensure!(n > 0, "mesh has no vertices");
        anyhow::ensure!(
            self.uvs.len() == n && self.normals.len() == n,
            "attribute count mismatch: {} positions, {} uvs, {} normals",
            n,
            self.uvs.len(),
            self.normals.len()
        );
        anyhow::ensure!(
            self.indices.len() % 3 == 0,
            "index count {} is not a triangle list",
            self.indices.len()
        );
        if let Some(&max) = self.indices.iter().max() {
            anyhow::ensure!(
                (max as usize) < n,
                "index {} out of bounds for {} vertices",
                max,
                n
            );
        }
        Ok(())
    }
}

/// In-memory mesh consumed by the renderer
#[derive(Debug, Clone)]
pub struct GarmentMesh {
    pub vertices: Vec<GarmentVertex>,
    pub indices: Vec<u32>,
}

impl GarmentMesh {
    /// Build from a validated asset payload
    pub fn from_data(data: &MeshData) -> Self {
        let vertices = data
            .positions
            .iter()
            .zip(&data.uvs)
            .zip(&data.normals)
            .map(|((&position, &uv), &normal)| GarmentVertex {
                position,
                uv,
                normal,
            })
            .collect();
        Self {
            vertices,
            indices: data.indices.clone(),
        }
    }

    /// Generate an axis-aligned box, the fallback product shape
    ///
    /// Every face carries full-quad UVs so the print texture stays visible on
    /// the placeholder.
    pub fn fallback_box(width: f32, height: f32, depth: f32) -> Self {
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        // Helper to add one quad face
        let mut add_face = |corners: [[f32; 3]; 4], normal: [f32; 3]| {
            let base = vertices.len() as u32;
            let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
            for (corner, uv) in corners.iter().zip(uvs) {
                vertices.push(GarmentVertex {
                    position: *corner,
                    uv,
                    normal,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2]);
            indices.extend_from_slice(&[base, base + 2, base + 3]);
        };

        // Front (+Z)
        add_face(
            [
                [-hw, -hh, hd],
                [hw, -hh, hd],
                [hw, hh, hd],
                [-hw, hh, hd],
            ],
            [0.0, 0.0, 1.0],
        );
        // Back (-Z)
        add_face(
            [
                [hw, -hh, -hd],
                [-hw, -hh, -hd],
                [-hw, hh, -hd],
                [hw, hh, -hd],
            ],
            [0.0, 0.0, -1.0],
        );
        // Right (+X)
        add_face(
            [
                [hw, -hh, hd],
                [hw, -hh, -hd],
                [hw, hh, -hd],
                [hw, hh, hd],
            ],
            [1.0, 0.0, 0.0],
        );
        // Left (-X)
        add_face(
            [
                [-hw, -hh, -hd],
                [-hw, -hh, hd],
                [-hw, hh, hd],
                [-hw, hh, -hd],
            ],
            [-1.0, 0.0, 0.0],
        );
        // Top (+Y)
        add_face(
            [
                [-hw, hh, hd],
                [hw, hh, hd],
                [hw, hh, -hd],
                [-hw, hh, -hd],
            ],
            [0.0, 1.0, 0.0],
        );
        // Bottom (-Y)
        add_face(
            [
                [-hw, -hh, -hd],
                [hw, -hh, -hd],
                [hw, -hh, hd],
                [-hw, -hh, hd],
            ],
            [0.0, -1.0, 0.0],
        );

        Self { vertices, indices }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get index count
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_box_counts() {
        let mesh = GarmentMesh::fallback_box(2.0, 2.5, 1.0);
        assert_eq!(mesh.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(mesh.index_count(), 36); // 6 faces * 2 triangles * 3
    }

    #[test]
    fn test_fallback_box_extents() {
        let mesh = GarmentMesh::fallback_box(2.0, 2.5, 1.0);
        let max_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert!((max_y - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_mesh_data_round_trip() {
        let data = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
        };
        data.validate().unwrap();
        let mesh = GarmentMesh::from_data(&data);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_mesh_data_validation_rejects_mismatch() {
        let data = MeshData {
            positions: vec![[0.0; 3]; 3],
            uvs: vec![[0.0; 2]; 2],
            normals: vec![[0.0; 3]; 3],
            indices: vec![0, 1, 2],
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_mesh_data_validation_rejects_bad_index() {
        let data = MeshData {
            positions: vec![[0.0; 3]; 3],
            uvs: vec![[0.0; 2]; 3],
            normals: vec![[0.0; 3]; 3],
            indices: vec![0, 1, 7],
        };
        assert!(data.validate().is_err());
    }
}
