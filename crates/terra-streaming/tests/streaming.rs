use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use glam::Vec3;
use terra_config::Config;
use terra_elevation::ElevationSource;
use terra_mesh::{CompositeKey, CompositeMesh, RegionSlot, RenderAttachment};
use terra_streaming::{CycleStatus, FrameOutcome, StreamingTerrain};
use terra_tiles::TileCoord;

type Sink = HashMap<CompositeKey, CompositeMesh>;

fn config() -> Config {
    let mut config = Config::default();
    config.terrain.seed = 7;
    config.terrain.world_size = 160.0;
    config.terrain.tile_count = 10;
    config.terrain.tile_resolution = 8;
    config.terrain.lod_distances = vec![1, 2, 3];
    config.streaming.idle_poll_ms = 5;
    config
}

/// Records the seed it was initialised with.
struct SeededRidge {
    seed: Arc<AtomicU32>,
}

impl ElevationSource for SeededRidge {
    fn init(&mut self, seed: u32, _world_size: f32) {
        self.seed.store(seed, Ordering::Relaxed);
    }

    fn height(&self, x: f32, z: f32) -> f32 {
        (x * 0.1).sin() * 4.0 + (z * 0.07).cos() * 3.0
    }
}

fn streamer() -> StreamingTerrain {
    StreamingTerrain::new(&config(), Box::new(|x: f32, z: f32| (x + z) * 0.01)).unwrap()
}

/// Calls `update` until a cycle is attached, returning every outcome seen.
fn settle(terrain: &mut StreamingTerrain, observer: Vec3, sink: &mut Sink) -> Vec<FrameOutcome> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut outcomes = Vec::new();
    loop {
        let outcome = terrain.update(observer, sink);
        outcomes.push(outcome);
        if matches!(outcome, FrameOutcome::Attached { .. }) {
            return outcomes;
        }
        assert!(Instant::now() < deadline, "no cycle finished: {outcomes:?}");
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_source_is_initialised_with_config_seed() {
    let seed = Arc::new(AtomicU32::new(0));
    let source = SeededRidge {
        seed: Arc::clone(&seed),
    };
    let _terrain = StreamingTerrain::new(&config(), Box::new(source)).unwrap();
    assert_eq!(seed.load(Ordering::Relaxed), 7);
}

#[test]
fn test_one_cycle_per_cell_change() {
    let mut terrain = streamer();
    let mut sink = Sink::new();

    // Tile size is 16; these positions all lie in cell (4, 4).
    let in_cell = [
        Vec3::new(64.5, 0.0, 64.5),
        Vec3::new(70.0, 30.0, 75.0),
        Vec3::new(79.9, 0.0, 64.0),
    ];

    settle(&mut terrain, in_cell[0], &mut sink);
    assert_eq!(terrain.cycles_started(), 1);

    for _ in 0..20 {
        for &p in &in_cell {
            assert_eq!(terrain.update(p, &mut sink), FrameOutcome::Unchanged);
        }
    }
    assert_eq!(terrain.cycles_started(), 1);
    assert_eq!(terrain.observer_cell(), Some(TileCoord::new(4, 4)));

    let outcomes = settle(&mut terrain, Vec3::new(80.0, 0.0, 64.0), &mut sink);
    assert_eq!(outcomes[0], FrameOutcome::Triggered(TileCoord::new(5, 4)));
    assert_eq!(terrain.cycles_started(), 2);
    assert_eq!(terrain.cycles_completed(), 2);
}

#[test]
fn test_moves_during_a_cycle_are_not_queued() {
    let mut terrain = streamer();
    let mut sink = Sink::new();

    assert_eq!(
        terrain.update(Vec3::new(8.0, 0.0, 8.0), &mut sink),
        FrameOutcome::Triggered(TileCoord::new(0, 0))
    );
    // Keep moving until the cycle comes back; none of these start a cycle.
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut x = 8.0;
    loop {
        x += 16.0;
        let outcome = terrain.update(Vec3::new(x % 160.0, 0.0, 8.0), &mut sink);
        assert!(!matches!(outcome, FrameOutcome::Triggered(_)));
        if matches!(outcome, FrameOutcome::Attached { .. }) {
            break;
        }
        assert!(Instant::now() < deadline);
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(terrain.cycles_started(), 1);
    assert_eq!(terrain.status(), CycleStatus::Idle);
}

#[test]
fn test_composites_cover_loaded_tiles() {
    let mut terrain = streamer();
    let mut sink = Sink::new();
    settle(&mut terrain, Vec3::new(72.0, 0.0, 88.0), &mut sink);

    // 1 center composite + 8 per outer ring.
    assert_eq!(sink.len(), 1 + 8 + 8);

    let state = terrain.state().unwrap();
    let tile_vertices: usize = state
        .classifier()
        .states()
        .iter()
        .map(|(coord, _)| state.mesh(coord).unwrap().vertex_count())
        .sum();
    let attached: usize = sink.values().map(CompositeMesh::vertex_count).sum();
    assert_eq!(attached, tile_vertices);

    for mesh in sink.values() {
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert_eq!(mesh.index_count() % 3, 0);
    }

    // Ring 0 around (4, 5) at full detail: 9 tiles of 9×9 vertices.
    let center = &sink[&CompositeKey::new(0, RegionSlot::Center)];
    assert_eq!(center.vertex_count(), 9 * 81);
}

#[test]
fn test_unloaded_regions_attach_empty_composites() {
    let mut terrain = streamer();
    let mut sink = Sink::new();
    settle(&mut terrain, Vec3::new(4.0, 0.0, 4.0), &mut sink);
    for slot in [RegionSlot::BottomLeft, RegionSlot::Bottom, RegionSlot::Left] {
        assert!(sink[&CompositeKey::new(2, slot)].is_empty(), "{slot:?}");
    }
    assert!(!sink[&CompositeKey::new(2, RegionSlot::TopRight)].is_empty());
}

#[test]
fn test_custom_attachment_sees_every_composite() {
    #[derive(Default)]
    struct Counter {
        calls: usize,
        vertices: usize,
    }
    impl RenderAttachment for Counter {
        fn attach(&mut self, mesh: &CompositeMesh) {
            self.calls += 1;
            self.vertices += mesh.vertex_count();
        }
    }

    let mut terrain = streamer();
    let mut counter = Counter::default();
    let deadline = Instant::now() + Duration::from_secs(10);
    while terrain.cycles_completed() == 0 {
        terrain.update(Vec3::new(40.0, 0.0, 40.0), &mut counter);
        assert!(Instant::now() < deadline);
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(counter.calls, 17);
    assert_eq!(counter.vertices, terrain.last_report().unwrap().vertices);
}

#[test]
fn test_drop_during_cycle_joins_worker() {
    let mut terrain = streamer();
    let mut sink = Sink::new();
    terrain.update(Vec3::new(100.0, 0.0, 100.0), &mut sink);
    drop(terrain);
}
