//! JSON document format.
//!
//! ```text
//! { "meta": {...}, "paths": [[[x,y], ...], ...], "ids": [[id, ...], ...] }
//! ```
//!
//! `ids` is optional on load.  Every flush re-reads the document, appends the
//! buffered frames, and atomically replaces the file (temp file + rename), so
//! a crash leaves either the old or the new document.  Total cost over a run
//! is quadratic in the number of ticks; prefer the line format for long runs.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use cf_core::{AgentId, Cell, Frame};

use crate::trace::decode_frame;
use crate::{Durability, SimulationMeta, Trace, TraceError, TraceResult, TraceWriter};

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    meta:  Option<SimulationMeta>,
    #[serde(default)]
    paths: Option<Vec<Vec<Cell>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ids:   Option<Vec<Vec<AgentId>>>,
}

impl Document {
    fn frames(self, path: &Path) -> TraceResult<Vec<Frame>> {
        let paths = self.paths.unwrap_or_default();
        let ids = match self.ids {
            Some(ids) if ids.len() != paths.len() => {
                return Err(TraceError::IdsMismatch {
                    path:  path.to_path_buf(),
                    ids:   ids.len(),
                    paths: paths.len(),
                });
            }
            Some(ids) => ids.into_iter().map(Some).collect(),
            None => vec![None; paths.len()],
        };
        paths
            .into_iter()
            .zip(ids)
            .enumerate()
            .map(|(i, (cells, ids))| decode_frame(path, i, ids, cells))
            .collect()
    }
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// Writes the JSON document format.
pub struct JsonTraceWriter {
    path:     PathBuf,
    meta:     SimulationMeta,
    batch:    usize,
    pending:  Vec<Frame>,
    /// `false` until the first flush, which starts a fresh document.
    started:  bool,
    appended: usize,
}

impl JsonTraceWriter {
    pub fn new(path: &Path, meta: SimulationMeta, durability: Durability) -> Self {
        Self {
            path:     path.to_path_buf(),
            meta,
            batch:    durability.batch_len().max(1),
            pending:  Vec::new(),
            started:  false,
            appended: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pending frames are only dropped once the rewrite has persisted; a
    /// failed flush keeps them for the next attempt.
    fn flush(&mut self) -> TraceResult<()> {
        let mut frames = if self.started { self.prior_frames()? } else { Vec::new() };
        frames.extend(self.pending.iter().cloned());

        let doc = Document {
            meta:  Some(self.meta.clone()),
            paths: Some(frames.iter().map(|f| f.cells.clone()).collect()),
            ids:   Some(frames.iter().map(|f| f.ids.clone()).collect()),
        };
        write_atomic(&self.path, &doc)?;
        self.pending.clear();
        self.started = true;
        debug!(path = %self.path.display(), frames = frames.len(), "rewrote trace document");
        Ok(())
    }

    /// Frames already on disk.  A missing, unparseable, or `paths`-less
    /// document counts as zero frames.
    fn prior_frames(&self) -> TraceResult<Vec<Frame>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "trace document vanished; restarting from zero frames");
                return Ok(Vec::new());
            }
            Err(e) => return Err(TraceError::io(&self.path)(e)),
        };
        let doc = match serde_json::from_str::<Document>(&text) {
            Ok(doc) if doc.paths.is_some() => doc,
            Ok(_) => {
                warn!(path = %self.path.display(), "trace document has no `paths`; treating as zero frames");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "trace document is corrupt; treating as zero frames");
                return Ok(Vec::new());
            }
        };
        match doc.frames(&self.path) {
            Ok(frames) => Ok(frames),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "trace frames are malformed; treating as zero frames");
                Ok(Vec::new())
            }
        }
    }
}

impl TraceWriter for JsonTraceWriter {
    fn append(&mut self, frame: &Frame) -> TraceResult<()> {
        self.pending.push(frame.clone());
        self.appended += 1;
        if self.pending.len() >= self.batch {
            self.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> TraceResult<()> {
        if self.started && self.pending.is_empty() {
            return Ok(());
        }
        self.flush()
    }

    fn frames_appended(&self) -> usize {
        self.appended
    }
}

fn write_atomic(path: &Path, doc: &Document) -> TraceResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(TraceError::io(dir))?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut out, doc).map_err(TraceError::json(path))?;
        out.flush().map_err(TraceError::io(path))?;
    }
    tmp.persist(path)
        .map_err(|e| TraceError::Io { path: path.to_path_buf(), source: e.error })?;
    Ok(())
}

// ── Loader ────────────────────────────────────────────────────────────────────

pub(crate) fn load(path: &Path) -> TraceResult<Trace> {
    let text = fs::read_to_string(path).map_err(TraceError::io(path))?;
    let mut doc: Document = serde_json::from_str(&text).map_err(TraceError::json(path))?;
    let meta = doc.meta.take().ok_or_else(|| TraceError::MissingMeta(path.to_path_buf()))?;
    let frames = doc.frames(path)?;
    debug!(path = %path.display(), frames = frames.len(), "loaded trace document");
    Ok(Trace { meta, frames })
}
