//! Concentric detail rings measured in tiles around the observer.

/// Ring radii in tiles. Ring `i` covers tiles whose Chebyshev distance to the
/// observer is at most `radii[i]` and greater than `radii[i - 1]`; its tiles
/// are meshed at detail level `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LodRings {
    radii: Vec<u32>,
}

impl LodRings {
    /// # Panics
    ///
    /// Panics if `radii` is empty, not strictly increasing, or has more rings
    /// than a `u8` level can index.
    pub fn new(radii: Vec<u32>) -> Self {
        assert!(!radii.is_empty(), "must have at least one ring");
        assert!(radii.len() <= usize::from(u8::MAX), "too many rings");
        for pair in radii.windows(2) {
            assert!(
                pair[1] > pair[0],
                "ring radii must be strictly increasing, got {radii:?}"
            );
        }
        Self { radii }
    }

    pub fn radii(&self) -> &[u32] {
        &self.radii
    }

    /// Number of rings, i.e. the number of detail levels.
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Radius of the outermost ring; tiles further away are unloaded.
    pub fn outer_radius(&self) -> u32 {
        self.radii[self.radii.len() - 1]
    }

    /// Detail level for a tile `distance` tiles from the observer: the first
    /// ring whose radius reaches it, or `None` beyond the outermost ring.
    pub fn select_level(&self, distance: u32) -> Option<u8> {
        self.radii
            .iter()
            .position(|&radius| distance <= radius)
            .map(|ring| ring as u8)
    }
}
