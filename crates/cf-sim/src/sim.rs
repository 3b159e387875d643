//! The `Sim` struct and its tick loop.

use tracing::{debug, info, trace};

use cf_core::{AgentId, Cell, Frame, SimConfig, Tick};
use cf_geometry::TileMap;
use cf_planner::Planner;

use crate::{NoopObserver, SimObserver, SimResult};

// ── SimState / TickReport ─────────────────────────────────────────────────────

/// Scheduler lifecycle.  `Completed` is terminal.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SimState {
    Running,
    Completed,
}

/// Per-tick counters.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickReport {
    pub tick:    Tick,
    /// Agents whose cell changed this tick.
    pub moved:   usize,
    /// Agents that held their cell (blocked, no path, or already on goal).
    pub stalled: usize,
    /// Agents removed for reaching the goal.
    pub removed: usize,
    /// Agents still active after removal.
    pub active:  usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The step scheduler.
///
/// Active agents are stored as two parallel arrays in slot order.  Slot
/// order is spawn order with removed agents compacted out, and it is the
/// priority order for cell reservations.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: Planner> {
    config:  SimConfig,
    /// Static occupancy grid; never mutated after build.
    grid:    TileMap,
    goal:    Cell,
    planner: P,
    ids:     Vec<AgentId>,
    cells:   Vec<Cell>,
    /// Tick the next `step` will run.
    tick:    Tick,
    state:   SimState,
}

impl<P: Planner> Sim<P> {
    pub(crate) fn from_parts(
        config:  SimConfig,
        grid:    TileMap,
        goal:    Cell,
        planner: P,
        ids:     Vec<AgentId>,
        cells:   Vec<Cell>,
        state:   SimState,
    ) -> Self {
        Self { config, grid, goal, planner, ids, cells, tick: Tick::ZERO, state }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> SimState {
        self.state
    }

    /// The tick the next [`step`](Self::step) will run.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn grid(&self) -> &TileMap {
        &self.grid
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn active_count(&self) -> usize {
        self.cells.len()
    }

    /// Current positions of all active agents in slot order.
    pub fn positions(&self) -> Frame {
        Frame { ids: self.ids.clone(), cells: self.cells.clone() }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run until `Completed` or until `config.max_ticks` ticks have run.
    ///
    /// Returns the final state.  Use [`NoopObserver`] if you don't need
    /// callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<SimState> {
        while self.state == SimState::Running {
            if self.config.max_ticks.is_some_and(|max| self.tick.0 >= max) {
                info!(tick = %self.tick, active = self.cells.len(), "tick limit reached");
                break;
            }
            self.step_observed(observer)?;
        }
        observer.on_sim_end(self.tick, self.state);
        Ok(self.state)
    }

    /// Run exactly one tick without callbacks.
    pub fn step(&mut self) -> SimResult<TickReport> {
        self.step_observed(&mut NoopObserver)
    }

    /// Run exactly one tick, invoking the per-tick observer hooks.
    ///
    /// On a `Completed` sim this is a no-op that reports zero active agents
    /// and does not advance the tick.
    pub fn step_observed<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        let now = self.tick;
        if self.state == SimState::Completed {
            return Ok(TickReport { tick: now, ..TickReport::default() });
        }

        observer.on_tick_start(now);
        let (frame, mut report) = self.process_tick(now);
        observer.on_frame(now, &frame);

        report.removed = self.remove_arrivals();
        report.active = self.cells.len();
        if self.cells.is_empty() {
            self.state = SimState::Completed;
            info!(tick = %now, "all agents reached the goal");
        }
        debug!(
            tick = %now,
            moved = report.moved,
            stalled = report.stalled,
            removed = report.removed,
            active = report.active,
            "tick"
        );
        observer.on_tick_end(now, &report);

        self.tick = now.next();
        Ok(report)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Move every active agent one step and return the resulting frame.
    fn process_tick(&mut self, now: Tick) -> (Frame, TickReport) {
        // Agents' current cells stay blocked for the whole tick, vacated or
        // not.
        let mut snapshot = self.grid.with_blocked(self.cells.iter().copied());
        let mut report = TickReport { tick: now, ..TickReport::default() };

        for (slot, cell) in self.cells.iter_mut().enumerate() {
            let next = match self.planner.find_path(&snapshot, *cell, self.goal) {
                Ok(path) => path.next_cell().unwrap_or(*cell),
                Err(err) => {
                    trace!(tick = %now, agent = %self.ids[slot], %err, "holding");
                    *cell
                }
            };
            snapshot.set_blocked(next, true);
            if next == *cell {
                report.stalled += 1;
            } else {
                report.moved += 1;
            }
            *cell = next;
        }

        (self.positions(), report)
    }

    /// Drop agents strictly inside the removal radius, keeping slot order.
    /// Returns the count.
    fn remove_arrivals(&mut self) -> usize {
        let (goal, radius) = (self.goal, self.config.removal_radius);
        let mut kept = 0;
        for slot in 0..self.cells.len() {
            if self.cells[slot].distance(goal) >= radius {
                self.cells[kept] = self.cells[slot];
                self.ids[kept] = self.ids[slot];
                kept += 1;
            }
        }
        let removed = self.cells.len() - kept;
        self.cells.truncate(kept);
        self.ids.truncate(kept);
        removed
    }
}
