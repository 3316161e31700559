//! Per-tile detail classification around the observer.
//!
//! Each cycle the classifier recomputes every tile's level from its ring,
//! loads and unloads tiles in the store as they enter and leave the outermost
//! ring, and marks which tiles need their meshes rebuilt. A tile is dirty when
//! its own level changed or one of its 8 neighbors' did, since either can
//! change the tile's seams.

use terra_tiles::{Edge, SeamMask, TileCoord, TileGrid, TileStore};
use tracing::debug;

use crate::rings::LodRings;

/// Detail state of one tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileState {
    /// Ring index, or `None` while the tile is unloaded.
    pub level: Option<u8>,
    /// Edges bordering a strictly coarser neighbor.
    pub seams: SeamMask,
    /// Set when the tile's mesh must be rebuilt this cycle.
    pub dirty: bool,
}

/// Outcome of one [`LodClassifier::classify`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifyReport {
    /// Tiles whose meshes must be rebuilt, `z` outer and `x` inner.
    pub dirty: Vec<TileCoord>,
    /// Tiles newly loaded into the store.
    pub loaded: usize,
    /// Tiles dropped from the store.
    pub unloaded: usize,
}

pub struct LodClassifier {
    rings: LodRings,
    states: TileGrid<TileState>,
}

impl LodClassifier {
    /// A classifier for a `grid_side × grid_side` grid with every tile unloaded.
    pub fn new(rings: LodRings, grid_side: u32) -> Self {
        Self {
            rings,
            states: TileGrid::filled(grid_side, TileState::default()),
        }
    }

    /// Reclassify every tile for an observer in tile cell `observer`.
    ///
    /// The observer may sit outside the grid; tiles are still classified by
    /// their distance to it.
    pub fn classify(&mut self, observer: TileCoord, store: &mut TileStore) -> ClassifyReport {
        let mut report = ClassifyReport::default();

        for (_, state) in self.states.iter_mut() {
            state.dirty = false;
        }

        for coord in self.states.coords() {
            let level = self
                .rings
                .select_level(coord.chebyshev_distance(observer));
            let Some(state) = self.states.get_mut(coord) else {
                continue;
            };
            let previous = state.level;
            if previous == level {
                continue;
            }
            state.level = level;

            match (previous, level) {
                (None, Some(_)) => {
                    store.load(coord);
                    report.loaded += 1;
                }
                (Some(_), None) => {
                    store.unload(coord);
                    report.unloaded += 1;
                }
                _ => {}
            }

            for neighbor in coord.with_neighbors() {
                if let Some(state) = self.states.get_mut(neighbor) {
                    state.dirty = true;
                }
            }
        }

        for coord in self.states.coords() {
            let Some(state) = self.states.get(coord).copied() else {
                continue;
            };
            if !state.dirty {
                continue;
            }
            let seams = self.compute_seams(coord, state.level);
            if let Some(state) = self.states.get_mut(coord) {
                state.seams = seams;
            }
            report.dirty.push(coord);
        }

        debug!(
            observer = %observer,
            dirty = report.dirty.len(),
            loaded = report.loaded,
            unloaded = report.unloaded,
            "classified tiles"
        );
        report
    }

    /// Edges whose in-grid neighbor is meshed at a strictly coarser level.
    fn compute_seams(&self, coord: TileCoord, level: Option<u8>) -> SeamMask {
        Edge::ALL
            .into_iter()
            .filter(|edge| {
                self.states
                    .get(edge.neighbor(coord))
                    .is_some_and(|neighbor| neighbor.level > level)
            })
            .collect()
    }

    /// Current level of `coord`; `None` when unloaded or off the grid.
    pub fn level(&self, coord: TileCoord) -> Option<u8> {
        self.states.get(coord).and_then(|s| s.level)
    }

    pub fn seams(&self, coord: TileCoord) -> SeamMask {
        self.states.get(coord).map(|s| s.seams).unwrap_or_default()
    }

    pub fn is_dirty(&self, coord: TileCoord) -> bool {
        self.states.get(coord).is_some_and(|s| s.dirty)
    }

    pub fn states(&self) -> &TileGrid<TileState> {
        &self.states
    }

    pub fn rings(&self) -> &LodRings {
        &self.rings
    }
}
