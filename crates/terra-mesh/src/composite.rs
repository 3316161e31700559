//! Composite meshes: the tiles of one ring region merged into a single draw.

use std::collections::HashMap;
use std::hash::BuildHasher;

use glam::{Vec2, Vec3};

use crate::region::CompositeKey;
use crate::tile_mesh::TileMesh;
use crate::vertex_format::TerrainVertex;

/// Concatenation of the tile meshes of one region.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeMesh {
    key: CompositeKey,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl CompositeMesh {
    pub fn new(key: CompositeKey) -> Self {
        Self {
            key,
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn key(&self) -> CompositeKey {
        self.key
    }

    /// Replace the contents with `meshes`, appended in iteration order.
    ///
    /// Each mesh's indices are offset by the number of vertices appended
    /// before it, so every index keeps addressing its own tile's vertices.
    /// Empty meshes contribute nothing.
    pub fn combine<'a>(&mut self, meshes: impl IntoIterator<Item = &'a TileMesh>) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();

        for mesh in meshes {
            let base = self.positions.len() as u32;
            self.positions.extend_from_slice(&mesh.positions);
            self.normals.extend_from_slice(&mesh.normals);
            self.uvs.extend_from_slice(&mesh.uvs);
            self.indices.extend(mesh.indices.iter().map(|&i| i + base));
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertices in the interleaved GPU layout.
    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| TerrainVertex::new(*p, *n, *uv))
            .collect()
    }
}

/// Receives rebuilt composites for drawing.
///
/// Called on the thread that owns the renderer, once per rebuilt composite.
/// Implementations replace whatever they previously held for `mesh.key()`.
pub trait RenderAttachment {
    fn attach(&mut self, mesh: &CompositeMesh);
}

/// CPU-side sink keeping the latest copy of every composite.
impl<S: BuildHasher> RenderAttachment for HashMap<CompositeKey, CompositeMesh, S> {
    fn attach(&mut self, mesh: &CompositeMesh) {
        match self.get_mut(&mesh.key()) {
            Some(slot) => slot.clone_from(mesh),
            None => {
                self.insert(mesh.key(), mesh.clone());
            }
        }
    }
}
