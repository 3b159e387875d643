//! Integer heatmaps shaped like the tile map.

use cf_core::Cell;

/// `width × height` counters, row-major, with a cached running maximum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heatmap {
    width:  u32,
    height: u32,
    counts: Vec<u32>,
    max:    u32,
}

impl Heatmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            counts: vec![0; width as usize * height as usize],
            max: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index_of(&self, cell: Cell) -> Option<usize> {
        (cell.x < self.width && cell.y < self.height)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Count at `cell`; 0 outside the grid.
    pub fn get(&self, cell: Cell) -> u32 {
        self.index_of(cell).map_or(0, |i| self.counts[i])
    }

    /// Add one at `cell`.  Returns `false` (and changes nothing) outside the
    /// grid.
    pub fn increment(&mut self, cell: Cell) -> bool {
        let Some(i) = self.index_of(cell) else { return false };
        let v = self.counts[i].saturating_add(1);
        self.counts[i] = v;
        self.max = self.max.max(v);
        true
    }

    /// Largest count.
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn sum(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// `count / max` in `[0, 1]`, or `None` when the map is empty (max 0):
    /// "no data" rather than a division by zero.
    pub fn normalized(&self, cell: Cell) -> Option<f32> {
        (self.max > 0).then(|| self.get(cell) as f32 / self.max as f32)
    }

    /// One slice per row, `y = 0` first.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.counts.chunks(self.width.max(1) as usize)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.max = 0;
    }
}
