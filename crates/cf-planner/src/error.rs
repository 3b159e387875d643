//! Planner error type.

use thiserror::Error;

use cf_core::Cell;

/// Errors produced by `cf-planner`.
///
/// Neither variant is fatal to a simulation: the scheduler holds the agent
/// in place for the tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("no path from {from} to {to}")]
    NoPath { from: Cell, to: Cell },

    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),
}

pub type PlanResult<T> = Result<T, PlanError>;
