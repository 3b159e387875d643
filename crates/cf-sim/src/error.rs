use thiserror::Error;

use cf_core::{Cell, CoreError};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("goal {goal} is outside the {width}x{height} grid")]
    GoalOutOfBounds { goal: Cell, width: u32, height: u32 },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
