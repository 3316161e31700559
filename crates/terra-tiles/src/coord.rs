//! Integer tile coordinates on the terrain grid.

use glam::Vec3;

/// Integer grid coordinate of a tile. `x` runs along world X, `z` along world Z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: i32,
    pub z: i32,
}

impl TileCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The tile containing a world-space position, for square tiles of `tile_size`.
    pub fn containing(position: Vec3, tile_size: f32) -> Self {
        Self {
            x: (position.x / tile_size).floor() as i32,
            z: (position.z / tile_size).floor() as i32,
        }
    }

    /// Returns the coordinate offset by `(dx, dz)`.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Chebyshev (chessboard) distance: `max(|dx|, |dz|)`. Rings of equal
    /// distance are squares.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// This coordinate and its 8 surrounding neighbors, row by row.
    pub fn with_neighbors(self) -> impl Iterator<Item = TileCoord> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dz| self.offset(dx, dz)))
    }

    /// World-space origin (minimum corner) of the tile at height zero.
    pub fn world_origin(self, tile_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * tile_size, 0.0, self.z as f32 * tile_size)
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containing_floors_negative_positions() {
        assert_eq!(
            TileCoord::containing(Vec3::new(-0.5, 10.0, 15.9), 16.0),
            TileCoord::new(-1, 0)
        );
        assert_eq!(
            TileCoord::containing(Vec3::new(32.0, 0.0, 47.99), 16.0),
            TileCoord::new(2, 2)
        );
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = TileCoord::new(2, 2);
        assert_eq!(a.chebyshev_distance(a), 0);
        assert_eq!(a.chebyshev_distance(TileCoord::new(3, 3)), 1);
        assert_eq!(a.chebyshev_distance(TileCoord::new(0, 3)), 2);
        assert_eq!(a.chebyshev_distance(TileCoord::new(-3, 1)), 5);
    }

    #[test]
    fn test_with_neighbors_covers_block() {
        let all: Vec<_> = TileCoord::new(5, 5).with_neighbors().collect();
        assert_eq!(all.len(), 9);
        assert!(all.contains(&TileCoord::new(4, 4)));
        assert!(all.contains(&TileCoord::new(5, 5)));
        assert!(all.contains(&TileCoord::new(6, 6)));
    }

    #[test]
    fn test_world_origin() {
        assert_eq!(
            TileCoord::new(3, -2).world_origin(10.0),
            Vec3::new(30.0, 0.0, -20.0)
        );
    }
}
