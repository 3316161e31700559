//! Tile mesh generation: strided height grids with seam stitching.
//!
//! A tile at detail level `L` is meshed from every `2^L`-th sample of its
//! height grid. Where a neighbor is meshed at a coarser level, the finer tile
//! has vertices halfway along the shared edge that the neighbor lacks. Those
//! T-junctions open cracks, so the builder pulls each such vertex onto the
//! straight line between its two neighbors along the edge. Only the finer tile
//! is adjusted; the coarser neighbor's mesh is untouched.

use glam::{Vec2, Vec3};
use terra_tiles::{Edge, SeamMask, Tile};

use crate::tile_mesh::TileMesh;

/// Vertex cells per tile edge at `level` for a tile of `base_resolution` cells.
///
/// # Panics
///
/// Panics if `base_resolution` is not divisible by the level's stride.
pub fn plane_resolution(base_resolution: u32, level: u8) -> u32 {
    let stride = 1u32
        .checked_shl(u32::from(level))
        .unwrap_or_else(|| panic!("detail level {level} is too coarse"));
    assert!(
        base_resolution % stride == 0,
        "base resolution {base_resolution} is not divisible by stride {stride}"
    );
    base_resolution / stride
}

/// Build the mesh of `tile` at `level`, stitching the edges in `seams`.
///
/// `origin` is the world-space minimum corner of the tile. A `None` level
/// yields an empty mesh.
///
/// Normals use the immediate (unstrided) neighbor samples, so coarse tiles keep
/// the shading detail of the full-resolution height grid.
///
/// # Panics
///
/// Panics if the tile's sample grid was not produced for `base_resolution`.
pub fn build_tile_mesh(
    tile: &Tile,
    origin: Vec3,
    tile_size: f32,
    base_resolution: u32,
    level: Option<u8>,
    seams: SeamMask,
) -> TileMesh {
    let Some(level) = level else {
        return TileMesh::new();
    };
    assert_eq!(
        tile.padded_side(),
        base_resolution as usize + 3,
        "tile {} was sampled for a different base resolution than {base_resolution}",
        tile.coord()
    );

    let res = plane_resolution(base_resolution, level) as usize;
    let stride = 1usize << level;
    let step = tile_size / res as f32;

    let mut mesh = TileMesh::with_capacity(res);
    for z in 0..=res {
        let hz = 1 + z * stride;
        for x in 0..=res {
            let hx = 1 + x * stride;

            let height = tile.sample(hx, hz);
            mesh.positions
                .push(origin + Vec3::new(x as f32 * step, height, z as f32 * step));

            let tangent = Vec3::new(2.0, tile.sample(hx + 1, hz) - tile.sample(hx - 1, hz), 0.0);
            let bitangent =
                Vec3::new(0.0, tile.sample(hx, hz + 1) - tile.sample(hx, hz - 1), 2.0);
            mesh.normals.push(bitangent.cross(tangent).normalize());

            mesh.uvs
                .push(Vec2::new(x as f32 / res as f32, z as f32 / res as f32));
        }
    }

    stitch_seams(&mut mesh, res as u32, seams);
    push_grid_indices(&mut mesh.indices, res as u32);
    mesh
}

/// Flatten the odd border vertices of every edge in `seams` onto the line
/// between their two neighbors along that edge.
///
/// Even border vertices are never modified, so applying the same mask twice
/// gives the same result as applying it once.
pub fn stitch_seams(mesh: &mut TileMesh, plane_resolution: u32, seams: SeamMask) {
    if mesh.positions.is_empty() {
        return;
    }
    let res = plane_resolution as usize;
    let row = res + 1;
    assert_eq!(
        mesh.positions.len(),
        row * row,
        "mesh does not match plane resolution {plane_resolution}"
    );

    for edge in seams.edges() {
        // First vertex on the edge, and the index step between consecutive
        // vertices along it.
        let (first, along) = match edge {
            Edge::South => (0, 1),
            Edge::North => (res * row, 1),
            Edge::West => (0, row),
            Edge::East => (res, row),
        };

        for i in (1..res).step_by(2) {
            let v = first + i * along;
            let before = mesh.positions[v - along].y;
            let after = mesh.positions[v + along].y;
            mesh.positions[v].y = before + (after - before) * 0.5;
        }
    }
}

/// Two triangles per grid cell with a fixed winding, independent of heights.
fn push_grid_indices(indices: &mut Vec<u32>, plane_resolution: u32) {
    let row = plane_resolution + 1;
    for z in 0..plane_resolution {
        for x in 0..plane_resolution {
            let v = z * row + x;
            indices.extend_from_slice(&[v, v + row, v + 1, v + 1, v + row, v + row + 1]);
        }
    }
}
