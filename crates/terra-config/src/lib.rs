//! Configuration for the terrain streamer.
//!
//! Settings are read once at startup, persist to disk as RON files, and can be
//! overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, HeightmapConfig, MAX_RING_RADIUS, StreamingConfig, TerrainConfig,
};
pub use error::ConfigError;
