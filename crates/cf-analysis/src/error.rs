//! Analysis error type.

use std::path::PathBuf;

use thiserror::Error;

use cf_core::Cell;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("trace has no frames to analyse")]
    EmptyTrace,

    #[error("frame {frame}: cell {cell} is outside the {width}x{height} grid")]
    CellOutOfBounds { frame: usize, cell: Cell, width: u32, height: u32 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
