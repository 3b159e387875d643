//! Simulation observer trait for progress reporting and trace recording.

use cf_core::{Frame, Tick};

use crate::{SimState, TickReport};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::step_observed`][crate::Sim::step_observed].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
///         println!("{tick}: {} active", report.active);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the snapshot is taken.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per tick with the new positions of every agent that was
    /// active at the start of the tick, before arrivals are removed.
    fn on_frame(&mut self, _tick: Tick, _frame: &Frame) {}

    /// Called at the end of each tick, after removal.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called once when [`Sim::run`][crate::Sim::run] returns.  `state` is
    /// `Running` if the run stopped on `max_ticks`.
    fn on_sim_end(&mut self, _final_tick: Tick, _state: SimState) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
