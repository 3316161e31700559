//! Partition of the ring layout into composite regions.
//!
//! Ring 0 is a single square centered on the observer. Every outer ring is the
//! square annulus between its radius and the previous one, cut into 8 pieces:
//!
//! ```text
//!  +----+-----------+----+
//!  | TL |    Top    | TR |   ^ +Z
//!  +----+-----------+----+   |
//!  |    |           |    |
//!  |Left|  (inner)  |Right
//!  |    |           |    |
//!  +----+-----------+----+
//!  | BL |  Bottom   | BR |   --> +X
//!  +----+-----------+----+
//! ```
//!
//! Corner blocks are `s × s` tiles where `s = R[i] - R[i-1]`; edge strips span
//! the `2 * R[i-1] + 1` tiles between the corners. Together the regions of all
//! rings tile the outermost square exactly once.

use terra_tiles::TileCoord;

/// Which piece of a ring a composite covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionSlot {
    /// The whole of ring 0.
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl RegionSlot {
    /// The 8 slots of every ring after the first.
    pub const RING: [RegionSlot; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
    ];

    /// Slots that exist for `ring`.
    pub fn for_ring(ring: u8) -> &'static [RegionSlot] {
        if ring == 0 { &[Self::Center] } else { &Self::RING }
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

/// Identifies one composite: a region slot within a detail ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    pub ring: u8,
    pub slot: RegionSlot,
}

impl CompositeKey {
    pub const fn new(ring: u8, slot: RegionSlot) -> Self {
        Self { ring, slot }
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ring {} {:?}", self.ring, self.slot)
    }
}

/// Every composite key for `ring_count` rings: 1 for ring 0, 8 for each other ring.
pub fn composite_keys(ring_count: usize) -> impl Iterator<Item = CompositeKey> {
    (0..ring_count as u8).flat_map(|ring| {
        RegionSlot::for_ring(ring)
            .iter()
            .map(move |&slot| CompositeKey::new(ring, slot))
    })
}

/// Half-open rectangle of tile coordinates: `min` inclusive, `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub min: TileCoord,
    pub max: TileCoord,
}

impl TileRect {
    pub const EMPTY: Self = Self {
        min: TileCoord::new(0, 0),
        max: TileCoord::new(0, 0),
    };

    pub const fn new(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Self {
        Self {
            min: TileCoord::new(min_x, min_z),
            max: TileCoord::new(max_x, max_z),
        }
    }

    /// Bounds computed in `i64`, pinned to the `i32` coordinate range.
    fn saturating(min_x: i64, min_z: i64, max_x: i64, max_z: i64) -> Self {
        let pin = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self::new(pin(min_x), pin(min_z), pin(max_x), pin(max_z))
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.z <= self.min.z
    }

    /// Number of tiles covered.
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            let width = u64::from(self.max.x.abs_diff(self.min.x));
            let depth = u64::from(self.max.z.abs_diff(self.min.z));
            usize::try_from(width.saturating_mul(depth)).unwrap_or(usize::MAX)
        }
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        (self.min.x..self.max.x).contains(&coord.x) && (self.min.z..self.max.z).contains(&coord.z)
    }

    /// Intersect with the grid `[0, side)²`. A rectangle entirely off the grid
    /// becomes empty.
    pub fn clamp_to_grid(&self, side: u32) -> Self {
        let side = side as i32;
        let clamp = |v: i32| v.clamp(0, side);
        let rect = Self::new(
            clamp(self.min.x),
            clamp(self.min.z),
            clamp(self.max.x),
            clamp(self.max.z),
        );
        if rect.is_empty() { Self::EMPTY } else { rect }
    }

    /// Covered coordinates, `x` outer and `z` inner.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let (min, max) = (self.min, self.max);
        (min.x..max.x).flat_map(move |x| (min.z..max.z).map(move |z| TileCoord::new(x, z)))
    }
}

/// Tiles covered by `key` around `center`, before clamping to the grid.
///
/// `radii` are the ascending ring radii. A slot that does not exist for the
/// key's ring (e.g. `Center` on ring 1) covers nothing.
///
/// # Panics
///
/// Panics if `key.ring` is not a valid index into `radii`.
pub fn region_rect(center: TileCoord, radii: &[u32], key: CompositeKey) -> TileRect {
    let ring = usize::from(key.ring);
    let outer = i64::from(radii[ring]);
    let (cx, cz) = (i64::from(center.x), i64::from(center.z));

    if ring == 0 {
        return match key.slot {
            RegionSlot::Center => {
                TileRect::saturating(cx - outer, cz - outer, cx + outer + 1, cz + outer + 1)
            }
            _ => TileRect::EMPTY,
        };
    }

    let inner = i64::from(radii[ring - 1]);
    // Column and row bands of the annulus: low side, middle, high side.
    let west = (cx - outer, cx - inner);
    let mid_x = (cx - inner, cx + inner + 1);
    let east = (cx + inner + 1, cx + outer + 1);
    let south = (cz - outer, cz - inner);
    let mid_z = (cz - inner, cz + inner + 1);
    let north = (cz + inner + 1, cz + outer + 1);

    let (xs, zs) = match key.slot {
        RegionSlot::Center => return TileRect::EMPTY,
        RegionSlot::TopLeft => (west, north),
        RegionSlot::TopRight => (east, north),
        RegionSlot::BottomLeft => (west, south),
        RegionSlot::BottomRight => (east, south),
        RegionSlot::Top => (mid_x, north),
        RegionSlot::Bottom => (mid_x, south),
        RegionSlot::Left => (west, mid_z),
        RegionSlot::Right => (east, mid_z),
    };
    TileRect::saturating(xs.0, zs.0, xs.1, zs.1)
}
