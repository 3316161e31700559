//! Loaded tile height samples, keyed by tile coordinate.

use rustc_hash::FxHashMap;
use terra_elevation::ElevationSource;
use tracing::trace;

use crate::coord::TileCoord;

/// Elevation samples for one tile.
///
/// The grid is `(resolution + 3)²`: the tile's own `resolution + 1` samples
/// per axis plus a one-sample halo on every side, so normals along the border
/// can be computed without touching neighboring tiles. Index `(1, 1)` is the
/// tile's minimum corner.
#[derive(Clone, Debug)]
pub struct Tile {
    coord: TileCoord,
    side: usize,
    samples: Vec<f32>,
}

impl Tile {
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Samples per side of the padded grid (`resolution + 3`).
    pub fn padded_side(&self) -> usize {
        self.side
    }

    /// Height at padded-grid index `(ix, iz)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside `0..padded_side()`.
    pub fn sample(&self, ix: usize, iz: usize) -> f32 {
        assert!(
            ix < self.side && iz < self.side,
            "sample ({ix}, {iz}) outside {0}x{0} tile grid",
            self.side
        );
        self.samples[iz * self.side + ix]
    }
}

/// Owns every loaded [`Tile`] and the elevation source they are sampled from.
pub struct TileStore {
    source: Box<dyn ElevationSource>,
    tile_size: f32,
    resolution: u32,
    tiles: FxHashMap<TileCoord, Tile>,
}

impl TileStore {
    /// Create an empty store. `source` must already be initialised.
    pub fn new(source: Box<dyn ElevationSource>, tile_size: f32, resolution: u32) -> Self {
        assert!(resolution > 0, "tile resolution must be non-zero");
        Self {
            source,
            tile_size,
            resolution,
            tiles: FxHashMap::default(),
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Full-detail cells per tile edge.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Sample the elevation source over the tile's padded footprint and store
    /// the result, replacing any tile already loaded at `coord`.
    pub fn load(&mut self, coord: TileCoord) {
        let res = i64::from(self.resolution);
        let spacing = self.tile_size / self.resolution as f32;
        let side = self.resolution as usize + 3;

        // Positions come from the global sample index so that two tiles
        // sharing an edge evaluate the source at bit-identical coordinates.
        let base_x = i64::from(coord.x) * res - 1;
        let base_z = i64::from(coord.z) * res - 1;

        let mut samples = Vec::with_capacity(side * side);
        for iz in 0..side as i64 {
            let wz = (base_z + iz) as f32 * spacing;
            for ix in 0..side as i64 {
                let wx = (base_x + ix) as f32 * spacing;
                samples.push(self.source.height(wx, wz));
            }
        }

        trace!(%coord, "loaded tile");
        self.tiles.insert(
            coord,
            Tile {
                coord,
                side,
                samples,
            },
        );
    }

    /// Drop the tile at `coord`. No-op if it is not loaded.
    pub fn unload(&mut self, coord: TileCoord) {
        if self.tiles.remove(&coord).is_some() {
            trace!(%coord, "unloaded tile");
        }
    }

    pub fn is_loaded(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Number of loaded tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
