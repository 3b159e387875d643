//! On-disk project layout.
//!
//! ```text
//! <root>/<project>/Models/<model>
//! <root>/<project>/Simulations/<simulation>.json[l]
//! <root>/<project>/Analytics/<simulation>/*.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use cf_trace::TraceFormat;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectLayout {
    dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: &Path, project: &str) -> Self {
        Self { dir: root.join(project) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// An absolute `model` is used as is.
    pub fn model_path(&self, model: &str) -> PathBuf {
        self.dir.join("Models").join(model)
    }

    pub fn simulations_dir(&self) -> PathBuf {
        self.dir.join("Simulations")
    }

    /// Where a new trace goes.  `format` only supplies a missing extension.
    pub fn trace_path(&self, simulation: &str, format: TraceFormat) -> PathBuf {
        let path = self.simulations_dir().join(simulation);
        if path.extension().is_some() {
            path
        } else {
            path.with_extension(format.extension())
        }
    }

    /// Find an existing trace, trying `.jsonl` then `.json` when `simulation`
    /// has no extension.
    pub fn find_trace(&self, simulation: &str) -> Result<PathBuf> {
        let path = self.simulations_dir().join(simulation);
        if path.extension().is_some() {
            if path.is_file() {
                return Ok(path);
            }
            bail!("trace {} does not exist", path.display());
        }
        for format in [TraceFormat::Lines, TraceFormat::Document] {
            let candidate = path.with_extension(format.extension());
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        bail!("no trace named `{simulation}` in {}", self.simulations_dir().display())
    }

    /// Export directory for a trace, named after its file stem.
    pub fn analytics_dir(&self, simulation: &str) -> PathBuf {
        let stem = Path::new(simulation)
            .file_stem()
            .map_or_else(|| simulation.into(), |s| s.to_os_string());
        self.dir.join("Analytics").join(stem)
    }
}
