use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

/// Indexed triangle list with per-vertex normals and UVs.
///
/// Triangles wind counter-clockwise when seen from the side their normals
/// point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Positions as a flat `[x, y, z, x, y, z, ...]` buffer.
    pub fn positions_flat(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn normals_flat(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    /// UVs as a flat `[u, v, u, v, ...]` buffer.
    pub fn uvs_flat(&self) -> Vec<f32> {
        self.uvs.iter().flatten().copied().collect()
    }

    /// Appends `other`, moved by `transform`, re-basing its indices.
    pub fn append_transformed(&mut self, other: &MeshBuffers, transform: &Transform) {
        let offset = self.positions.len() as u32;
        self.positions
            .extend(other.positions.iter().map(|p| transform.transform_point(*p)));
        self.normals.extend(
            other
                .normals
                .iter()
                .map(|n| (transform.rotation * *n).normalize_or_zero()),
        );
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Replaces `normals` with the area-weighted average of the face normals
    /// of every triangle touching each vertex.
    ///
    /// The unnormalized cross product of two triangle edges has length
    /// `2 * area`, so summing it weights each face by its area for free.
    /// Vertices not referenced by any non-degenerate triangle get a zero
    /// normal.
    pub fn compute_area_weighted_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];
        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }
        self.normals = accum.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone());
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs.clone());
        mesh.insert_indices(Indices::U32(self.indices.clone()));
        mesh
    }
}
