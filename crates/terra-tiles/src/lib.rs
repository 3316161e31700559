//! Tile grid primitives and the tile store.
//!
//! A terrain is a square grid of tiles addressed by [`TileCoord`]. Per-tile
//! bookkeeping lives in a bounds-checked [`TileGrid`], and elevation samples
//! for the tiles currently in view live in the [`TileStore`].

mod coord;
mod edge;
mod grid;
mod store;

pub use coord::TileCoord;
pub use edge::{Edge, SeamMask};
pub use grid::TileGrid;
pub use store::{Tile, TileStore};
