//! Fluent builder for constructing a [`Sim`].

use rustc_hash::FxHashSet;
use tracing::info;

use cf_core::{AgentId, Cell, CoreError, SimConfig, SimRng, SpawnRect};
use cf_geometry::TileMap;
use cf_planner::Planner;

use crate::sim::SimState;
use crate::spawn::spawn_agents;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, removal radius, tick bound
/// - [`TileMap`]: the static occupancy grid
/// - the goal cell
/// - `P: Planner`: the planning algorithm (e.g. [`cf_planner::AStarPlanner`])
///
/// # Optional inputs
///
/// | Method                  | Default                  |
/// |-------------------------|--------------------------|
/// | `.agents(cells)`        | no explicit starts       |
/// | `.spawn(rects, count)`  | no spawn rectangles      |
///
/// Explicit starts come first, then spawned ones; duplicates keep their
/// first slot.  IDs are assigned `0..n` in that order.  A sim with no agents
/// is built already `Completed`.
pub struct SimBuilder<P: Planner> {
    config:   SimConfig,
    grid:     TileMap,
    goal:     Cell,
    planner:  P,
    starts:   Vec<Cell>,
    rects:    Vec<SpawnRect>,
    per_rect: u32,
}

impl<P: Planner> SimBuilder<P> {
    pub fn new(config: SimConfig, grid: TileMap, goal: Cell, planner: P) -> Self {
        Self {
            config,
            grid,
            goal,
            planner,
            starts:   Vec::new(),
            rects:    Vec::new(),
            per_rect: 0,
        }
    }

    /// Place agents at exact cells.  Every cell must be inside the grid.
    pub fn agents(mut self, starts: Vec<Cell>) -> Self {
        self.starts = starts;
        self
    }

    /// Sample `per_rect` agents from each rectangle with the config's seed
    /// (see [`spawn_agents`]).
    pub fn spawn(mut self, rects: Vec<SpawnRect>, per_rect: u32) -> Self {
        self.rects = rects;
        self.per_rect = per_rect;
        self
    }

    /// Validate inputs, spawn, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        let (width, height) = self.grid.size();
        if !self.grid.in_bounds(self.goal) {
            return Err(SimError::GoalOutOfBounds { goal: self.goal, width, height });
        }
        if let Some(&cell) = self.starts.iter().find(|&&c| !self.grid.in_bounds(c)) {
            return Err(CoreError::OutOfGrid { cell, width, height }.into());
        }

        let mut rng = SimRng::new(self.config.seed);
        let spawned = spawn_agents(&self.grid, &self.rects, self.per_rect, &mut rng);

        let mut seen = FxHashSet::default();
        let cells: Vec<Cell> = self
            .starts
            .into_iter()
            .chain(spawned)
            .filter(|c| seen.insert(*c))
            .collect();
        let ids = (0..cells.len())
            .map(AgentId::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SimError::Config(format!("{} agents exceed the ID space", cells.len())))?;

        let state = if cells.is_empty() { SimState::Completed } else { SimState::Running };
        info!(
            agents = cells.len(),
            goal = %self.goal,
            grid = ?(width, height),
            seed = self.config.seed,
            "simulation built"
        );

        Ok(Sim::from_parts(self.config, self.grid, self.goal, self.planner, ids, cells, state))
    }
}
