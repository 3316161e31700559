//! Ring-based detail selection for the terrain tile grid.

pub mod classifier;
pub mod rings;

pub use classifier::{ClassifyReport, LodClassifier, TileState};
pub use rings::LodRings;
