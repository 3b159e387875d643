//! Error types for cf-trace.

use std::path::{Path, PathBuf};

use thiserror::Error;

use cf_core::CoreError;

/// Errors that can occur when writing or loading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trace JSON in {path}: {source}")]
    Json {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("trace {0} has no `meta` record")]
    MissingMeta(PathBuf),

    #[error("trace {path}: frame {index} is malformed: {source}")]
    Frame {
        path:   PathBuf,
        index:  usize,
        #[source]
        source: CoreError,
    },

    #[error("trace {path}: `ids` has {ids} frames but `paths` has {paths}")]
    IdsMismatch { path: PathBuf, ids: usize, paths: usize },

    #[error("trace configuration error: {0}")]
    Config(String),
}

/// Alias for `Result<T, TraceError>`.
pub type TraceResult<T> = Result<T, TraceError>;

impl TraceError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> TraceError + '_ {
        move |source| TraceError::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn json(path: &Path) -> impl FnOnce(serde_json::Error) -> TraceError + '_ {
        move |source| TraceError::Json { path: path.to_path_buf(), source }
    }
}
