//! Terrain meshing: per-tile grids with seam stitching, ring region layout,
//! and composite meshes ready for GPU upload.

pub mod builder;
pub mod composite;
pub mod region;
pub mod tile_mesh;
pub mod vertex_format;

pub use builder::{build_tile_mesh, plane_resolution, stitch_seams};
pub use composite::{CompositeMesh, RenderAttachment};
pub use region::{CompositeKey, RegionSlot, TileRect, composite_keys, region_rect};
pub use tile_mesh::TileMesh;
pub use vertex_format::{TERRAIN_VERTEX_ATTRIBUTES, TERRAIN_VERTEX_LAYOUT, TerrainVertex};
