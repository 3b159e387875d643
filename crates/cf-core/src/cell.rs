//! Grid coordinate type and neighbourhood helpers.
//!
//! Cells are addressed `(x, y)` with `x` growing right and `y` growing down,
//! matching the pixel layout of the floor-plan the grid was rasterised from.
//! Coordinates are unsigned: a cell is never negative, and bounds checks
//! against the grid size happen in `cf-geometry::TileMap`.

use std::fmt;

/// Offsets of the 8-connected neighbourhood: four orthogonal, then four
/// diagonal.  Expansion order in the planner follows this table.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// A grid cell.  Serialised as a two-element array `[x, y]`, the shape used
/// in trace files.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[u32; 2]", into = "[u32; 2]"))]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in cell units.
    pub fn distance(self, other: Cell) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// The cell at `self + (dx, dy)`, or `None` if either coordinate would
    /// go negative or overflow.  Upper bounds are the grid's concern.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Cell> {
        Some(Cell {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// `true` if `other` is one of the 8 cells surrounding `self`.
    pub fn is_neighbor(self, other: Cell) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }

    /// Iterator over the in-range 8-neighbours in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self) -> impl Iterator<Item = (Cell, i32, i32)> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(dx, dy).map(|c| (c, dx, dy)))
    }
}

impl From<[u32; 2]> for Cell {
    #[inline]
    fn from([x, y]: [u32; 2]) -> Self {
        Cell { x, y }
    }
}

impl From<Cell> for [u32; 2] {
    #[inline]
    fn from(c: Cell) -> Self {
        [c.x, c.y]
    }
}

impl From<(u32, u32)> for Cell {
    #[inline]
    fn from((x, y): (u32, u32)) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
