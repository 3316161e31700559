//! Elevation sources: the height-field capability the tile store samples, and a
//! default layered-noise implementation.

mod fbm;
mod source;

pub use fbm::{FbmElevation, HeightmapParams};
pub use source::ElevationSource;
