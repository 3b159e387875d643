//! Initial crowd placement.

use rustc_hash::FxHashSet;

use cf_core::{Cell, SimRng, SpawnRect};
use cf_geometry::TileMap;

/// Sample `per_rect` starting cells from each rectangle.
///
/// Samples are uniform over the inclusive bounds `x..=x+w`, `y..=y+h`.
/// Samples outside the grid or on blocked cells are discarded, and the
/// union is deduplicated keeping first-seen order, so the result can be
/// shorter than `rects.len() * per_rect`.
///
/// Each rectangle samples from its own child stream of `rng`, so resizing
/// one rectangle leaves the samples drawn in the others unchanged.
pub fn spawn_agents(
    grid:     &TileMap,
    rects:    &[SpawnRect],
    per_rect: u32,
    rng:      &mut SimRng,
) -> Vec<Cell> {
    let mut seen = FxHashSet::default();
    let mut cells = Vec::new();
    for (index, rect) in rects.iter().enumerate() {
        let mut rng = rng.child(index as u64);
        for _ in 0..per_rect {
            let cell = Cell::new(rng.gen_range(rect.x_range()), rng.gen_range(rect.y_range()));
            if grid.is_free(cell) && seen.insert(cell) {
                cells.push(cell);
            }
        }
    }
    cells
}
