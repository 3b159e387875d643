//! Geometry-subsystem error type.
//!
//! Every variant is a configuration error from the simulation's point of
//! view: the run must abort before any agent state exists.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by `cf-geometry`.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("cannot read model file {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed SVG: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("<rect> #{index}: missing required attribute `{name}`")]
    MissingAttribute { index: usize, name: &'static str },

    #[error("<rect> #{index}: attribute `{name}` = {value:?} is not a number")]
    BadNumber { index: usize, name: &'static str, value: String },

    #[error("<rect> #{index}: fill {value:?} is not a 6-digit hex color")]
    BadColor { index: usize, value: String },

    #[error("cannot decode raster model: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported model file type: {0}")]
    UnsupportedModel(PathBuf),

    #[error("invalid grid configuration: {0}")]
    Config(String),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
