//! Per-tile mesh buffers produced by the builder.

use glam::{Vec2, Vec3};

/// Geometry of one tile at one detail level.
///
/// Vertices are stored as parallel arrays; index `i` of each array describes
/// the same vertex. An empty mesh means the tile is not rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileMesh {
    /// World-space vertex positions.
    pub positions: Vec<Vec3>,
    /// Unit vertex normals.
    pub normals: Vec<Vec3>,
    /// Texture coordinates spanning `[0, 1]` across the tile.
    pub uvs: Vec<Vec2>,
    /// Triangle list, 3 indices per triangle.
    pub indices: Vec<u32>,
}

impl TileMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for a `plane_resolution²`-cell grid.
    pub fn with_capacity(plane_resolution: usize) -> Self {
        let vertices = (plane_resolution + 1).pow(2);
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(plane_resolution.pow(2) * 6),
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the mesh has no vertices and no indices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.indices.is_empty()
    }
}
