//! Occupancy grid and its builder.
//!
//! # Rasterisation rule
//!
//! Cell `(i, j)` sits at pixel `(i * cell_size, j * cell_size)`.  A square
//! probe of `probe` map units is centred there (origin at
//! `pixel - probe / 2`, integer division) and the cell is blocked iff the
//! probe overlaps at least one obstacle under [`Rect::overlaps`].
//!
//! # Spatial index
//!
//! Obstacles are bulk-loaded into an R-tree (via `rstar`).  The tree only
//! prunes: the parent test is the closed envelope intersection, and the leaf
//! test is the same half-open overlap a brute-force scan would use, so the
//! grid is identical either way.

use rstar::{AABB, Envelope, RTree, RTreeObject, SelectionFunction};
use tracing::debug;

use cf_core::Cell;

use crate::raster::RasterMask;
use crate::{GeometryError, GeometryResult, Obstacle, Rect};

/// Side length of the probe square, in map units.
pub const DEFAULT_PROBE_SIZE: u32 = 10;

// ── TileMap ───────────────────────────────────────────────────────────────────

/// `width × height` grid of blocked/free cells.
///
/// Built once per simulation and never mutated afterwards; the scheduler
/// works on clones made with [`with_blocked`](Self::with_blocked).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    width:     u32,
    height:    u32,
    cell_size: u32,
    /// Row-major: cell `(x, y)` is at `y * width + x`.
    blocked:   Vec<bool>,
}

impl TileMap {
    /// An all-free grid.
    pub fn new(width: u32, height: u32, cell_size: u32) -> GeometryResult<Self> {
        validate_dims(width, height, cell_size)?;
        Ok(Self {
            width,
            height,
            cell_size,
            blocked: vec![false; width as usize * height as usize],
        })
    }

    /// Wrap a raster mask; the grid takes the mask's shape.
    pub fn from_mask(mask: RasterMask, cell_size: u32) -> GeometryResult<Self> {
        validate_dims(mask.width, mask.height, cell_size)?;
        Ok(Self {
            width: mask.width,
            height: mask.height,
            cell_size,
            blocked: mask.blocked,
        })
    }

    /// Build from text rows, `#` blocked and anything else free.  Row `j` is
    /// `y = j`.  Handy for fixtures; all rows must be the same length.
    pub fn from_ascii(rows: &[&str], cell_size: u32) -> GeometryResult<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
        if rows.iter().any(|r| r.chars().count() as u32 != width) {
            return Err(GeometryError::Config("ragged tile-map rows".into()));
        }
        let mut map = Self::new(width, height, cell_size)?;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    map.set_blocked(Cell::new(x as u32, y as u32), true);
                }
            }
        }
        Ok(map)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixels per cell.
    #[inline]
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    // ── Cell access ───────────────────────────────────────────────────────

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Row-major index of `cell`, or `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index % w) as u32, (index / w) as u32)
    }

    /// `true` for blocked cells.  Out-of-bounds cells count as blocked.
    #[inline]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.index_of(cell).is_none_or(|i| self.blocked[i])
    }

    /// `true` for in-bounds, unblocked cells.
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        !self.is_blocked(cell)
    }

    /// Set a cell's state.  Returns `false` (and does nothing) when `cell`
    /// is out of bounds.
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) -> bool {
        match self.index_of(cell) {
            Some(i) => {
                self.blocked[i] = blocked;
                true
            }
            None => false,
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }

    /// All blocked cells in row-major order: the collider overlay a
    /// renderer draws.
    pub fn blocked_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| self.cell_at(i))
    }

    /// A copy with every cell in `cells` additionally blocked.
    /// Out-of-bounds cells are ignored.
    pub fn with_blocked<I: IntoIterator<Item = Cell>>(&self, cells: I) -> TileMap {
        let mut snapshot = self.clone();
        for c in cells {
            snapshot.set_blocked(c, true);
        }
        snapshot
    }

    /// Pixel-space rectangle covered by `cell` (for renderers).
    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let s = self.cell_size as i32;
        Rect::new(cell.x as i32 * s, cell.y as i32 * s, s, s)
    }
}

fn validate_dims(width: u32, height: u32, cell_size: u32) -> GeometryResult<()> {
    if width == 0 || height == 0 {
        return Err(GeometryError::Config(format!("grid size {width}x{height} is empty")));
    }
    if cell_size == 0 {
        return Err(GeometryError::Config("grid cell size must be positive".into()));
    }
    Ok(())
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

struct ObstacleEntry {
    rect: Rect,
}

impl RTreeObject for ObstacleEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        let (lo, hi) = self.rect.corners();
        AABB::from_corners(lo, hi)
    }
}

/// Selects obstacles that overlap `probe` under the half-open rule.
struct ProbeHits {
    probe:    Rect,
    envelope: AABB<[i64; 2]>,
}

impl ProbeHits {
    fn new(probe: Rect) -> Self {
        let (lo, hi) = probe.corners();
        Self { probe, envelope: AABB::from_corners(lo, hi) }
    }
}

impl SelectionFunction<ObstacleEntry> for ProbeHits {
    fn should_unpack_parent(&self, envelope: &AABB<[i64; 2]>) -> bool {
        envelope.intersects(&self.envelope)
    }

    fn should_unpack_leaf(&self, leaf: &ObstacleEntry) -> bool {
        self.probe.overlaps(&leaf.rect)
    }
}

// ── TileMapBuilder ────────────────────────────────────────────────────────────

/// Rasterises obstacles into a [`TileMap`].
///
/// # Example
///
/// ```
/// use cf_core::Cell;
/// use cf_geometry::{Obstacle, Rect, Rgb, TileMapBuilder};
///
/// let wall = Obstacle { rect: Rect::new(20, 0, 10, 50), color: Rgb::BLACK };
/// let map = TileMapBuilder::new((5, 5), 10).unwrap().build(&[wall]);
/// assert!(map.is_blocked(Cell::new(2, 0)));
/// assert!(map.is_free(Cell::new(0, 0)));
/// ```
#[derive(Clone, Debug)]
pub struct TileMapBuilder {
    grid_size:  (u32, u32),
    cell_size:  u32,
    probe_size: u32,
}

impl TileMapBuilder {
    /// Validate dimensions up front so a bad launch aborts before any work.
    pub fn new(grid_size: (u32, u32), cell_size: u32) -> GeometryResult<Self> {
        validate_dims(grid_size.0, grid_size.1, cell_size)?;
        Ok(Self { grid_size, cell_size, probe_size: DEFAULT_PROBE_SIZE })
    }

    /// Override the probe side length (default [`DEFAULT_PROBE_SIZE`]).
    pub fn probe_size(mut self, probe_size: u32) -> GeometryResult<Self> {
        if probe_size == 0 {
            return Err(GeometryError::Config("probe size must be positive".into()));
        }
        self.probe_size = probe_size;
        Ok(self)
    }

    /// Rasterise `obstacles`.  Pure: identical inputs give identical grids.
    pub fn build(&self, obstacles: &[Obstacle]) -> TileMap {
        let index = RTree::bulk_load(
            obstacles.iter().map(|o| ObstacleEntry { rect: o.rect }).collect(),
        );

        let (width, height) = self.grid_size;
        let n = width as usize * height as usize;
        let probe_at = |i: usize| -> bool {
            let x = (i % width as usize) as i64;
            let y = (i / width as usize) as i64;
            self.probe_hits(&index, x, y)
        };

        #[cfg(not(feature = "parallel"))]
        let blocked: Vec<bool> = (0..n).map(probe_at).collect();

        #[cfg(feature = "parallel")]
        let blocked: Vec<bool> = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(probe_at).collect()
        };

        let map = TileMap { width, height, cell_size: self.cell_size, blocked };
        debug!(
            width,
            height,
            obstacles = obstacles.len(),
            blocked = map.blocked_count(),
            "rasterised tile map"
        );
        map
    }

    fn probe_hits(&self, index: &RTree<ObstacleEntry>, x: i64, y: i64) -> bool {
        let cs = self.cell_size as i64;
        let half = self.probe_size as i64 / 2;
        let probe = Rect::new(
            clamp_i32(x * cs - half),
            clamp_i32(y * cs - half),
            self.probe_size as i32,
            self.probe_size as i32,
        );
        index
            .locate_with_selection_function(ProbeHits::new(probe))
            .next()
            .is_some()
    }
}

#[inline]
fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
