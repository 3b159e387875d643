//! JSON-lines format.
//!
//! ```text
//! {"meta": {...}}
//! {"ids": [0, 1], "cells": [[3, 4], [5, 6]]}
//! {"ids": [1], "cells": [[5, 7]]}
//! ```
//!
//! Appends are O(1).  A crash mid-write can leave a partial final line
//! (no trailing newline); the loader drops it with a warning.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cf_core::{AgentId, Cell, Frame};

use crate::trace::decode_frame;
use crate::{Durability, SimulationMeta, Trace, TraceError, TraceResult, TraceWriter};

#[derive(Serialize)]
struct MetaOut<'a> {
    meta: &'a SimulationMeta,
}

#[derive(Deserialize)]
struct MetaIn {
    #[serde(default)]
    meta: Option<SimulationMeta>,
}

#[derive(Serialize)]
struct FrameOut<'a> {
    ids:   &'a [AgentId],
    cells: &'a [Cell],
}

#[derive(Deserialize)]
struct FrameIn {
    #[serde(default)]
    ids:   Option<Vec<AgentId>>,
    cells: Vec<Cell>,
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// Writes the JSON-lines format.
pub struct JsonLinesTraceWriter {
    path:      PathBuf,
    meta:      SimulationMeta,
    batch:     usize,
    /// Opened (and the meta line written) on first use.
    out:       Option<BufWriter<File>>,
    unflushed: usize,
    appended:  usize,
}

impl JsonLinesTraceWriter {
    pub fn new(path: &Path, meta: SimulationMeta, durability: Durability) -> Self {
        Self {
            path: path.to_path_buf(),
            meta,
            batch: durability.batch_len().max(1),
            out: None,
            unflushed: 0,
            appended: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&mut self) -> TraceResult<()> {
        if let Some(out) = self.out.as_mut() {
            out.flush().map_err(TraceError::io(&self.path))?;
        }
        self.unflushed = 0;
        Ok(())
    }
}

/// Create the file and write the meta line if that hasn't happened yet.
fn open<'a>(
    slot: &'a mut Option<BufWriter<File>>,
    path: &Path,
    meta: &SimulationMeta,
) -> TraceResult<&'a mut BufWriter<File>> {
    let out = match slot.take() {
        Some(out) => out,
        None => {
            let mut out = BufWriter::new(File::create(path).map_err(TraceError::io(path))?);
            serde_json::to_writer(&mut out, &MetaOut { meta }).map_err(TraceError::json(path))?;
            out.write_all(b"\n").map_err(TraceError::io(path))?;
            debug!(path = %path.display(), "opened trace");
            out
        }
    };
    Ok(slot.insert(out))
}

impl TraceWriter for JsonLinesTraceWriter {
    fn append(&mut self, frame: &Frame) -> TraceResult<()> {
        let out = open(&mut self.out, &self.path, &self.meta)?;
        let line = FrameOut { ids: &frame.ids, cells: &frame.cells };
        serde_json::to_writer(&mut *out, &line).map_err(TraceError::json(&self.path))?;
        out.write_all(b"\n").map_err(TraceError::io(&self.path))?;

        self.appended += 1;
        self.unflushed += 1;
        if self.unflushed >= self.batch {
            self.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> TraceResult<()> {
        open(&mut self.out, &self.path, &self.meta)?;
        self.flush()
    }

    fn frames_appended(&self) -> usize {
        self.appended
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

pub(crate) fn load(path: &Path) -> TraceResult<Trace> {
    let text = fs::read_to_string(path).map_err(TraceError::io(path))?;
    let mut records = text.lines().filter(|l| !l.trim().is_empty());

    let header = records.next().ok_or_else(|| TraceError::MissingMeta(path.to_path_buf()))?;
    let meta = serde_json::from_str::<MetaIn>(header)
        .map_err(TraceError::json(path))?
        .meta
        .ok_or_else(|| TraceError::MissingMeta(path.to_path_buf()))?;

    let body: Vec<&str> = records.collect();
    let unterminated = !text.ends_with('\n');
    let mut frames = Vec::with_capacity(body.len());
    for (i, line) in body.iter().enumerate() {
        match serde_json::from_str::<FrameIn>(line) {
            Ok(rec) => frames.push(decode_frame(path, i, rec.ids, rec.cells)?),
            Err(e) if unterminated && i + 1 == body.len() => {
                warn!(path = %path.display(), frame = i, error = %e, "dropping truncated final frame");
            }
            Err(e) => return Err(TraceError::json(path)(e)),
        }
    }
    debug!(path = %path.display(), frames = frames.len(), "loaded trace lines");
    Ok(Trace { meta, frames })
}
