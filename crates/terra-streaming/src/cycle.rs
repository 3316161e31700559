//! One synchronous streaming cycle: classify, rebuild, aggregate.

use std::time::{Duration, Instant};

use terra_config::TerrainConfig;
use terra_elevation::ElevationSource;
use terra_lod::{LodClassifier, LodRings};
use terra_mesh::{CompositeKey, CompositeMesh, TileMesh, build_tile_mesh, composite_keys, region_rect};
use terra_tiles::{TileCoord, TileGrid, TileStore};
use tracing::{debug, trace};

/// Everything a cycle reads and writes. Owned by exactly one thread at a time.
pub struct TerrainState {
    store: TileStore,
    classifier: LodClassifier,
    meshes: TileGrid<TileMesh>,
    composites: Vec<CompositeMesh>,
}

impl TerrainState {
    /// Build an empty state from a validated terrain config. `source` must
    /// already be initialised.
    ///
    /// # Panics
    ///
    /// Panics if `config.lod_distances` is empty or not strictly increasing.
    pub fn new(config: &TerrainConfig, source: Box<dyn ElevationSource>) -> Self {
        Self::with_layout(
            source,
            config.tile_size(),
            config.tile_resolution,
            config.tile_count,
            LodRings::new(config.lod_distances.clone()),
        )
    }

    pub fn with_layout(
        source: Box<dyn ElevationSource>,
        tile_size: f32,
        tile_resolution: u32,
        grid_side: u32,
        rings: LodRings,
    ) -> Self {
        let composites = composite_keys(rings.len()).map(CompositeMesh::new).collect();
        Self {
            store: TileStore::new(source, tile_size, tile_resolution),
            classifier: LodClassifier::new(rings, grid_side),
            meshes: TileGrid::from_fn(grid_side, |_| TileMesh::new()),
            composites,
        }
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn classifier(&self) -> &LodClassifier {
        &self.classifier
    }

    /// The current mesh of `coord`; empty while the tile is unloaded.
    pub fn mesh(&self, coord: TileCoord) -> Option<&TileMesh> {
        self.meshes.get(coord)
    }

    /// One composite per ring region, ring 0 first.
    pub fn composites(&self) -> &[CompositeMesh] {
        &self.composites
    }

    pub fn composite(&self, key: CompositeKey) -> Option<&CompositeMesh> {
        self.composites.iter().find(|c| c.key() == key)
    }

    pub fn tile_size(&self) -> f32 {
        self.store.tile_size()
    }
}

/// Summary of one [`run_cycle`].
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub observer: TileCoord,
    /// Tiles whose meshes were rebuilt or cleared.
    pub dirty: usize,
    pub loaded: usize,
    pub unloaded: usize,
    /// Dirty tiles meshed from their samples.
    pub rebuilt: usize,
    /// Dirty tiles with a level but no samples in the store.
    pub skipped: usize,
    /// Vertices across all composites after aggregation.
    pub vertices: usize,
    pub elapsed: Duration,
}

/// Run a full cycle for an observer standing in tile cell `observer`.
pub fn run_cycle(state: &mut TerrainState, observer: TileCoord) -> CycleReport {
    let start = Instant::now();
    let classified = state.classifier.classify(observer, &mut state.store);

    let tile_size = state.store.tile_size();
    let resolution = state.store.resolution();
    let mut rebuilt = 0;
    let mut skipped = 0;

    for &coord in &classified.dirty {
        let Some(mesh) = state.meshes.get_mut(coord) else {
            continue;
        };
        let level = state.classifier.level(coord);
        if level.is_none() {
            mesh.clear();
            continue;
        }
        let Some(tile) = state.store.get(coord) else {
            trace!(%coord, "tile has a level but no samples, skipping rebuild");
            skipped += 1;
            continue;
        };
        *mesh = build_tile_mesh(
            tile,
            coord.world_origin(tile_size),
            tile_size,
            resolution,
            level,
            state.classifier.seams(coord),
        );
        rebuilt += 1;
    }

    let radii = state.classifier.rings().radii();
    let side = state.meshes.side();
    let meshes = &state.meshes;
    let mut vertices = 0;
    for composite in &mut state.composites {
        let rect = region_rect(observer, radii, composite.key()).clamp_to_grid(side);
        composite.combine(rect.coords().filter_map(|coord| meshes.get(coord)));
        vertices += composite.vertex_count();
    }

    let report = CycleReport {
        observer,
        dirty: classified.dirty.len(),
        loaded: classified.loaded,
        unloaded: classified.unloaded,
        rebuilt,
        skipped,
        vertices,
        elapsed: start.elapsed(),
    };
    debug!(
        observer = %observer,
        dirty = report.dirty,
        rebuilt,
        skipped,
        vertices,
        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
        "terrain cycle complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_mesh::RegionSlot;

    const RES: u32 = 4;

    fn state(side: u32, radii: &[u32]) -> TerrainState {
        TerrainState::with_layout(
            Box::new(|x: f32, z: f32| (x * 0.3).sin() + z * 0.05),
            8.0,
            RES,
            side,
            LodRings::new(radii.to_vec()),
        )
    }

    fn vertices_at(level: u8) -> usize {
        ((RES >> level) as usize + 1).pow(2)
    }

    #[test]
    fn test_first_cycle_meshes_every_ring() {
        let mut terrain = state(5, &[1, 2]);
        let report = run_cycle(&mut terrain, TileCoord::new(2, 2));

        assert_eq!(report.loaded, 25);
        assert_eq!(report.rebuilt, 25);
        assert_eq!(report.skipped, 0);
        assert_eq!(terrain.composites().len(), 9);

        let center = terrain
            .composite(CompositeKey::new(0, RegionSlot::Center))
            .unwrap();
        assert_eq!(center.vertex_count(), 9 * vertices_at(0));

        // Every ring-1 region is non-empty: 4 corners of one tile, 4 edges of three.
        for slot in RegionSlot::RING {
            let composite = terrain.composite(CompositeKey::new(1, slot)).unwrap();
            let tiles = if slot.is_corner() { 1 } else { 3 };
            assert_eq!(composite.vertex_count(), tiles * vertices_at(1), "{slot:?}");
            assert!(
                composite
                    .indices
                    .iter()
                    .all(|&i| (i as usize) < composite.vertex_count())
            );
        }
        assert_eq!(report.vertices, 9 * vertices_at(0) + 16 * vertices_at(1));
    }

    #[test]
    fn test_composite_vertices_sum_tile_meshes() {
        let mut terrain = state(9, &[1, 2, 4]);
        run_cycle(&mut terrain, TileCoord::new(3, 5));

        let tiles: usize = terrain
            .classifier()
            .states()
            .iter()
            .filter(|(coord, s)| s.level.is_some() && coord.chebyshev_distance(TileCoord::new(3, 5)) <= 4)
            .map(|(coord, _)| terrain.mesh(coord).unwrap().vertex_count())
            .sum();
        let composites: usize = terrain.composites().iter().map(|c| c.vertex_count()).sum();
        assert_eq!(composites, tiles);
    }

    #[test]
    fn test_unloaded_tiles_have_empty_meshes() {
        let mut terrain = state(8, &[1, 2]);
        run_cycle(&mut terrain, TileCoord::new(1, 1));
        let report = run_cycle(&mut terrain, TileCoord::new(6, 6));

        assert!(report.unloaded > 0);
        for (coord, s) in terrain.classifier().states().iter() {
            let mesh = terrain.mesh(coord).unwrap();
            assert_eq!(s.level.is_none(), mesh.is_empty(), "{coord}");
            assert_eq!(s.level.is_some(), terrain.store().is_loaded(coord));
        }
    }

    #[test]
    fn test_quiet_cycle_rebuilds_nothing() {
        let mut terrain = state(5, &[1, 2]);
        let first = run_cycle(&mut terrain, TileCoord::new(2, 2));
        let second = run_cycle(&mut terrain, TileCoord::new(2, 2));
        assert_eq!(second.dirty, 0);
        assert_eq!(second.rebuilt, 0);
        assert_eq!(second.vertices, first.vertices);
    }

    #[test]
    fn test_huge_outer_radius_keeps_every_tile_in_a_composite() {
        for radii in [[1, 3_000_000_000], [1, i32::MAX as u32]] {
            let mut terrain = state(5, &radii);
            let report = run_cycle(&mut terrain, TileCoord::new(2, 2));
            assert_eq!(report.loaded, 25);

            let tiles: usize = terrain
                .classifier()
                .states()
                .iter()
                .map(|(coord, _)| terrain.mesh(coord).unwrap().vertex_count())
                .sum();
            assert_eq!(report.vertices, tiles, "{radii:?}");
            assert_eq!(tiles, 9 * vertices_at(0) + 16 * vertices_at(1));
        }
    }

    #[test]
    fn test_observer_near_corner_clamps_regions() {
        let mut terrain = state(6, &[1, 3]);
        run_cycle(&mut terrain, TileCoord::new(0, 0));

        // Nothing lies west or south of the grid.
        for slot in [RegionSlot::BottomLeft, RegionSlot::Left, RegionSlot::Bottom] {
            assert!(terrain.composite(CompositeKey::new(1, slot)).unwrap().is_empty());
        }
        let center = terrain
            .composite(CompositeKey::new(0, RegionSlot::Center))
            .unwrap();
        assert_eq!(center.vertex_count(), 4 * vertices_at(0));
        let top_right = terrain
            .composite(CompositeKey::new(1, RegionSlot::TopRight))
            .unwrap();
        assert_eq!(top_right.vertex_count(), 4 * vertices_at(1));
    }
}
