//! Planning trait and the default A* implementation.
//!
//! # Pluggability
//!
//! `cf-sim` plans through the [`Planner`] trait, so an incremental planner
//! (D*-Lite, field-based navigation) can replace [`AStarPlanner`] without
//! touching the scheduler.
//!
//! # Costs
//!
//! Orthogonal steps cost 1, diagonal steps cost √2, and the heuristic is the
//! Euclidean distance to the goal.  The heuristic is consistent for this
//! move set, so a node never needs reopening once expanded.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use cf_core::Cell;
use cf_geometry::TileMap;

use crate::{PlanError, PlanResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// A planned path, start and goal inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Cells in travel order; `cells[0]` is the start.
    pub cells: Vec<Cell>,
    /// Sum of step costs along `cells`.
    pub cost:  f64,
}

impl Path {
    /// The cell to move to this tick: the second cell, or the start when
    /// the path has length 1.
    pub fn next_cell(&self) -> Option<Cell> {
        self.cells.get(1).or_else(|| self.cells.first()).copied()
    }

    /// `true` if start and goal coincide.
    pub fn is_trivial(&self) -> bool {
        self.cells.len() <= 1
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable path planner.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one planner can be shared by
/// simulations running on different threads.
pub trait Planner: Send + Sync {
    /// Plan from `start` to `goal` over `grid`.
    ///
    /// `start == goal` yields a one-cell path.  The start cell is never
    /// tested for blocking: in a scheduling snapshot it is the agent's own
    /// (blocked) cell.
    fn find_path(&self, grid: &TileMap, start: Cell, goal: Cell) -> PlanResult<Path>;
}

// ── CornerCutting ─────────────────────────────────────────────────────────────

/// Whether a diagonal step may squeeze between two blocked orthogonal
/// neighbours.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum CornerCutting {
    /// Diagonal steps only require the destination to be free.
    #[default]
    Allow,
    /// A diagonal step `(dx, dy)` is pruned when both `(x + dx, y)` and
    /// `(x, y + dy)` are blocked.
    Forbid,
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// 8-connected A* over a [`TileMap`].
///
/// Neighbours are expanded in a fixed order (orthogonals, then diagonals) and
/// open-set ties on `f` are broken by insertion order, so the same grid
/// always yields the same path.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarPlanner {
    pub corner_cutting: CornerCutting,
}

impl AStarPlanner {
    pub fn new(corner_cutting: CornerCutting) -> Self {
        Self { corner_cutting }
    }
}

impl Planner for AStarPlanner {
    fn find_path(&self, grid: &TileMap, start: Cell, goal: Cell) -> PlanResult<Path> {
        astar(grid, start, goal, self.corner_cutting)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

const NO_PARENT: usize = usize::MAX;

/// Open-set entry.  `BinaryHeap` is a max-heap, so the ordering is reversed:
/// lowest `f` first, then earliest `seq`.
struct Open {
    f:     f64,
    seq:   u64,
    index: usize,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn astar(grid: &TileMap, start: Cell, goal: Cell, corners: CornerCutting) -> PlanResult<Path> {
    let start_idx = grid.index_of(start).ok_or(PlanError::OutOfBounds(start))?;
    let goal_idx = grid.index_of(goal).ok_or(PlanError::OutOfBounds(goal))?;

    if start_idx == goal_idx {
        return Ok(Path { cells: vec![start], cost: 0.0 });
    }

    let n = grid.cell_count();
    // g[v] = best known cost to reach v.
    let mut g      = vec![f64::INFINITY; n];
    let mut parent = vec![NO_PARENT; n];
    let mut closed = vec![false; n];

    let mut seq = 0u64;
    let mut open = BinaryHeap::new();
    g[start_idx] = 0.0;
    open.push(Open { f: start.distance(goal), seq, index: start_idx });

    while let Some(Open { index: idx, .. }) = open.pop() {
        if closed[idx] {
            continue;
        }
        if idx == goal_idx {
            return Ok(reconstruct(grid, &parent, goal_idx, g[goal_idx]));
        }
        closed[idx] = true;

        let current = grid.cell_at(idx);
        for (next, dx, dy) in current.neighbors() {
            // Out-of-bounds cells report as blocked.
            if grid.is_blocked(next) {
                continue;
            }
            let diagonal = dx != 0 && dy != 0;
            if diagonal && corners == CornerCutting::Forbid && squeezes(grid, current, dx, dy) {
                continue;
            }
            let Some(next_idx) = grid.index_of(next) else { continue };
            if closed[next_idx] {
                continue;
            }

            let step = if diagonal { std::f64::consts::SQRT_2 } else { 1.0 };
            let tentative = g[idx] + step;
            if tentative < g[next_idx] {
                g[next_idx] = tentative;
                parent[next_idx] = idx;
                seq += 1;
                open.push(Open {
                    f: tentative + next.distance(goal),
                    seq,
                    index: next_idx,
                });
            }
        }
    }

    Err(PlanError::NoPath { from: start, to: goal })
}

/// `true` if both orthogonal cells flanking the diagonal step are blocked.
fn squeezes(grid: &TileMap, from: Cell, dx: i32, dy: i32) -> bool {
    let side = |ox: i32, oy: i32| from.offset(ox, oy).is_none_or(|c| grid.is_blocked(c));
    side(dx, 0) && side(0, dy)
}

fn reconstruct(grid: &TileMap, parent: &[usize], goal_idx: usize, cost: f64) -> Path {
    let mut cells = Vec::new();
    let mut cur = goal_idx;
    while cur != NO_PARENT {
        cells.push(grid.cell_at(cur));
        cur = parent[cur];
    }
    cells.reverse();
    Path { cells, cost }
}
