//! Cardinal tile edges and the per-tile seam bitmask.

use crate::coord::TileCoord;

/// One of the four cardinal edges of a tile.
///
/// The `repr(u8)` discriminant is the edge's bit inside [`SeamMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Edge {
    /// +Z side (last vertex row).
    North = 0x1,
    /// −Z side (first vertex row).
    South = 0x2,
    /// −X side (first vertex column).
    West = 0x4,
    /// +X side (last vertex column).
    East = 0x8,
}

impl Edge {
    /// All four edges in bit order.
    pub const ALL: [Edge; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// Grid offset `(dx, dz)` to the neighbor across this edge.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }

    /// The neighbor coordinate across this edge.
    pub const fn neighbor(self, coord: TileCoord) -> TileCoord {
        let (dx, dz) = self.delta();
        coord.offset(dx, dz)
    }

    pub const fn bit(self) -> u8 {
        self as u8
    }
}

/// Set of edges that border a strictly coarser neighbor and must be stitched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SeamMask(u8);

impl SeamMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0xF);

    /// Build a mask from raw bits; bits above the four edges are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0xF)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, edge: Edge) -> bool {
        self.0 & edge.bit() != 0
    }

    pub fn insert(&mut self, edge: Edge) {
        self.0 |= edge.bit();
    }

    pub fn remove(&mut self, edge: Edge) {
        self.0 &= !edge.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The edges present in this mask, in [`Edge::ALL`] order.
    pub fn edges(self) -> impl Iterator<Item = Edge> {
        Edge::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

impl FromIterator<Edge> for SeamMask {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut mask = Self::NONE;
        for edge in iter {
            mask.insert(edge);
        }
        mask
    }
}
