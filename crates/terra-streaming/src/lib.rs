//! Background terrain streaming.
//!
//! [`StreamingTerrain`] is polled once per frame from the render thread. When
//! the observer crosses into a new tile cell it hands the whole
//! [`TerrainState`] to a worker thread, which reclassifies tiles, rebuilds
//! dirty meshes and re-aggregates every composite. The finished state comes
//! back on a later frame and its composites are attached to the renderer.

mod cycle;
mod error;
mod scheduler;
mod status;

pub use cycle::{CycleReport, TerrainState, run_cycle};
pub use error::StreamingError;
pub use scheduler::{FrameOutcome, StreamingTerrain};
pub use status::CycleStatus;
