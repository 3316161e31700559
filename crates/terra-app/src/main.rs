//! Headless terrain streaming demo.
//!
//! Walks an observer across a noise terrain for a fixed number of frames and
//! logs every streaming cycle. Configuration is loaded from `config.ron` and
//! can be overridden via CLI flags, e.g.
//! `cargo run -p terra-app -- --frames 300 --lod-distances 1,3,6`.

mod walk;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use rustc_hash::FxHashMap;
use terra_config::{CliArgs, Config};
use terra_elevation::{FbmElevation, HeightmapParams};
use terra_mesh::{CompositeKey, CompositeMesh};
use terra_streaming::{FrameOutcome, StreamingTerrain};
use tracing::{debug, error, info};

use crate::walk::Walker;

#[derive(Parser, Debug)]
#[command(name = "terra", about = "Headless LOD terrain streaming demo")]
struct DemoArgs {
    #[command(flatten)]
    terrain: CliArgs,

    /// Frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Observer speed in tiles per second.
    #[arg(long, default_value_t = 4.0)]
    speed: f32,

    /// Simulated frame time in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

fn main() -> ExitCode {
    let args = DemoArgs::parse();

    let config_dir = args.terrain.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("terra"))
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.terrain);

    terra_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    let source = FbmElevation::new(HeightmapParams::from(&config.heightmap));
    info!(
        seed = config.terrain.seed,
        max_height = source.max_height(),
        "using fractal noise elevation"
    );

    let mut terrain = match StreamingTerrain::new(&config, Box::new(source)) {
        Ok(terrain) => terrain,
        Err(e) => {
            error!("Failed to start terrain streaming: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink: FxHashMap<CompositeKey, CompositeMesh> = FxHashMap::default();
    let mut walker = Walker::new(config.terrain.world_size, terrain.tile_size() * args.speed);
    let frame_time = Duration::from_millis(args.frame_ms);

    for frame in 0..args.frames {
        let observer = walker.advance(frame_time.as_secs_f32());
        match terrain.update(observer, &mut sink) {
            FrameOutcome::Triggered(cell) => debug!(frame, %cell, "cycle triggered"),
            FrameOutcome::Attached { composites } => {
                if let Some(report) = terrain.last_report() {
                    info!(
                        frame,
                        cell = %report.observer,
                        composites,
                        rebuilt = report.rebuilt,
                        loaded = report.loaded,
                        unloaded = report.unloaded,
                        vertices = report.vertices,
                        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                        "terrain updated"
                    );
                }
            }
            FrameOutcome::Unchanged | FrameOutcome::Busy => {}
        }
        std::thread::sleep(frame_time);
    }

    terrain.shutdown();

    let visible = sink.values().filter(|mesh| !mesh.is_empty()).count();
    let triangles: usize = sink.values().map(|mesh| mesh.index_count() / 3).sum();
    info!(
        cycles = terrain.cycles_completed(),
        composites = visible,
        triangles,
        loaded_tiles = terrain.state().map_or(0, |state| state.store().len()),
        "demo finished"
    );
    ExitCode::SUCCESS
}
