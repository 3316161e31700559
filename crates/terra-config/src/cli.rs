//! Command-line argument parsing for the terrain tools.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terra", about = "LOD terrain streaming")]
pub struct CliArgs {
    /// Elevation seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// World side length in world units.
    #[arg(long)]
    pub world_size: Option<f32>,

    /// Tiles along each side of the grid.
    #[arg(long)]
    pub tile_count: Option<u32>,

    /// Full-detail cells per tile edge.
    #[arg(long)]
    pub tile_resolution: Option<u32>,

    /// Comma-separated ring radii in tiles, e.g. `2,4,8`.
    #[arg(long, value_delimiter = ',')]
    pub lod_distances: Option<Vec<u32>>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(size) = args.world_size {
            self.terrain.world_size = size;
        }
        if let Some(count) = args.tile_count {
            self.terrain.tile_count = count;
        }
        if let Some(res) = args.tile_resolution {
            self.terrain.tile_resolution = res;
        }
        if let Some(ref rings) = args.lod_distances {
            self.terrain.lod_distances = rings.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
