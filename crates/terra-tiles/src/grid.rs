//! Owned square grid of per-tile values with bounds-checked access.

use crate::coord::TileCoord;

/// A `side × side` grid of `T`, one entry per tile coordinate in
/// `[0, side)²`. Out-of-range coordinates (including negative ones) are
/// rejected by every accessor instead of aliasing another cell.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid<T> {
    side: u32,
    cells: Vec<T>,
}

impl<T> TileGrid<T> {
    /// Create a grid where every cell is produced by `init(coord)`.
    pub fn from_fn(side: u32, mut init: impl FnMut(TileCoord) -> T) -> Self {
        let mut cells = Vec::with_capacity((side as usize).pow(2));
        for z in 0..side as i32 {
            for x in 0..side as i32 {
                cells.push(init(TileCoord::new(x, z)));
            }
        }
        Self { side, cells }
    }

    /// Tiles along each side.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Returns `true` if the coordinate lies on the grid.
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.index(coord).is_some()
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        let side = self.side as i32;
        if (0..side).contains(&coord.x) && (0..side).contains(&coord.z) {
            Some(coord.z as usize * self.side as usize + coord.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, coord: TileCoord) -> Option<&T> {
        self.index(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut T> {
        self.index(coord).map(|i| &mut self.cells[i])
    }

    /// Every coordinate on the grid, `z` outer and `x` inner.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + use<T> {
        let side = self.side as i32;
        (0..side).flat_map(move |z| (0..side).map(move |x| TileCoord::new(x, z)))
    }

    /// Coordinates paired with values, in [`coords`](Self::coords) order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &T)> {
        self.coords().zip(self.cells.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TileCoord, &mut T)> {
        self.coords().zip(self.cells.iter_mut())
    }
}

impl<T: Clone> TileGrid<T> {
    /// Create a grid with every cell set to `value`.
    pub fn filled(side: u32, value: T) -> Self {
        Self {
            side,
            cells: vec![value; (side as usize).pow(2)],
        }
    }
}
