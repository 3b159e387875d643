//! CSV export for external renderers.
//!
//! Creates three files in the output directory:
//! - `density.csv`: one row per grid row, one column per cell
//! - `stuck.csv`: same shape
//! - `stuck_vectors.csv`: `from_x,from_y,to_x,to_y`

use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use crate::{AnalysisError, AnalysisResult, CongestionAnalyzer, Heatmap, StuckVector};

/// Where [`export`] put its files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportPaths {
    pub density:       PathBuf,
    pub stuck:         PathBuf,
    pub stuck_vectors: PathBuf,
}

/// Write a heatmap as a headerless grid of counts.
pub fn write_heatmap_csv(path: &Path, map: &Heatmap) -> AnalysisResult<()> {
    let mut w = Writer::from_path(path)?;
    for row in map.rows() {
        w.write_record(row.iter().map(u32::to_string))?;
    }
    w.flush().map_err(|source| AnalysisError::Io { path: path.to_path_buf(), source })?;
    Ok(())
}

pub fn write_stuck_vectors_csv(path: &Path, vectors: &[StuckVector]) -> AnalysisResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(["from_x", "from_y", "to_x", "to_y"])?;
    for v in vectors {
        w.write_record(&[
            v.from.x.to_string(),
            v.from.y.to_string(),
            v.to.x.to_string(),
            v.to.y.to_string(),
        ])?;
    }
    w.flush().map_err(|source| AnalysisError::Io { path: path.to_path_buf(), source })?;
    Ok(())
}

/// Write all three CSVs into `dir`, creating it if needed.
pub fn export(dir: &Path, analyzer: &CongestionAnalyzer) -> AnalysisResult<ExportPaths> {
    fs::create_dir_all(dir).map_err(|source| AnalysisError::Io { path: dir.to_path_buf(), source })?;
    let paths = ExportPaths {
        density:       dir.join("density.csv"),
        stuck:         dir.join("stuck.csv"),
        stuck_vectors: dir.join("stuck_vectors.csv"),
    };
    write_heatmap_csv(&paths.density, analyzer.density())?;
    write_heatmap_csv(&paths.stuck, analyzer.stuck())?;
    let vectors = analyzer.stuck_vectors();
    write_stuck_vectors_csv(&paths.stuck_vectors, &vectors)?;
    info!(
        dir = %dir.display(),
        max_density = analyzer.density().max(),
        max_stuck = analyzer.stuck().max(),
        vectors = vectors.len(),
        "exported analytics"
    );
    Ok(paths)
}
