//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level terrain configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Tile grid and LOD ring layout.
    pub terrain: TerrainConfig,
    /// Parameters for the default noise elevation source.
    pub heightmap: HeightmapConfig,
    /// Background worker settings.
    pub streaming: StreamingConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Largest ring radius accepted, in tiles. Tile coordinates are `i32`.
pub const MAX_RING_RADIUS: u32 = i32::MAX as u32;

/// Tile grid layout and LOD ring thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed handed to the elevation source.
    pub seed: u32,
    /// Side length of the whole square terrain in world units.
    pub world_size: f32,
    /// Number of tiles along each side of the grid.
    pub tile_count: u32,
    /// Full-detail vertex cells per tile edge (LOD 0).
    pub tile_resolution: u32,
    /// Ascending ring radii in tiles (Chebyshev distance). `lod_distances[i]`
    /// is the outermost distance rendered at detail level `i`.
    pub lod_distances: Vec<u32>,
}

/// Layered noise parameters for the default elevation source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeightmapConfig {
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency of the first octave, in cycles per world size.
    pub base_frequency: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Weight multiplier between successive octaves.
    pub persistence: f64,
    /// Power applied to the summed, normalised noise. Values above 1 flatten
    /// lowlands and sharpen peaks.
    pub exponent: f64,
    /// Final height scale in world units.
    pub amplitude: f64,
}

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// How long the idle worker waits for a cycle request before re-checking
    /// its stop flag, in milliseconds.
    pub idle_poll_ms: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_size: 4096.0,
            tile_count: 64,
            tile_resolution: 64,
            lod_distances: vec![2, 4, 8, 16],
        }
    }
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            octaves: 3,
            base_frequency: 20.0,
            lacunarity: 2.0,
            persistence: 0.5,
            exponent: 1.5,
            amplitude: 100.0,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { idle_poll_ms: 100 }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl TerrainConfig {
    /// World-space side length of a single tile.
    pub fn tile_size(&self) -> f32 {
        self.world_size / self.tile_count as f32
    }

    /// Number of detail rings (and therefore LOD levels).
    pub fn lod_count(&self) -> usize {
        self.lod_distances.len()
    }

    /// Check that the layout can be meshed at every configured level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.world_size.is_finite() || self.world_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "world_size must be positive, got {}",
                self.world_size
            )));
        }
        if self.tile_count == 0 {
            return Err(ConfigError::Invalid("tile_count must be non-zero".into()));
        }
        if self.lod_distances.is_empty() {
            return Err(ConfigError::Invalid(
                "lod_distances must name at least one ring".into(),
            ));
        }
        if self.lod_distances.len() > 16 {
            return Err(ConfigError::Invalid(format!(
                "at most 16 LOD rings are supported, got {}",
                self.lod_distances.len()
            )));
        }
        if let Some(w) = self.lod_distances.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ConfigError::Invalid(format!(
                "lod_distances must be strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }
        if let Some(&r) = self.lod_distances.iter().find(|&&r| r > MAX_RING_RADIUS) {
            return Err(ConfigError::Invalid(format!(
                "lod_distances radius {r} exceeds the largest tile offset {MAX_RING_RADIUS}"
            )));
        }
        let coarsest_stride = 1u32 << (self.lod_distances.len() - 1);
        if self.tile_resolution == 0 || self.tile_resolution % coarsest_stride != 0 {
            return Err(ConfigError::Invalid(format!(
                "tile_resolution {} must be a non-zero multiple of {coarsest_stride}",
                self.tile_resolution
            )));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Validate every section that has constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        if self.heightmap.octaves == 0 {
            return Err(ConfigError::Invalid("heightmap.octaves must be non-zero".into()));
        }
        Ok(())
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
