//! Workspace base error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` or wrap it as one variant.  Both patterns are used;
//! pick whichever keeps the error sites clean.

use thiserror::Error;

use crate::Cell;

/// The top-level error type for `cf-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cell {cell} is outside the {width}x{height} grid")]
    OutOfGrid { cell: Cell, width: u32, height: u32 },

    #[error("frame has {ids} ids but {cells} cells")]
    FrameShape { ids: usize, cells: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `cf-core`.
pub type CoreResult<T> = Result<T, CoreError>;
