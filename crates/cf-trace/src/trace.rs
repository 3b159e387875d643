//! Loaded traces and format dispatch.

use std::path::Path;

use cf_core::{AgentId, Cell, Frame};

use crate::{SimulationMeta, TraceError, TraceResult, document, lines};

/// On-disk trace encoding.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TraceFormat {
    /// One JSON object, rewritten on every flush.
    Document,
    /// A meta line followed by one frame per line.
    Lines,
}

impl TraceFormat {
    /// `.jsonl` selects [`Lines`](Self::Lines); anything else is a document.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") => TraceFormat::Lines,
            _ => TraceFormat::Document,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TraceFormat::Document => "json",
            TraceFormat::Lines => "jsonl",
        }
    }
}

/// A fully loaded trace: metadata plus one frame per recorded tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub meta:   SimulationMeta,
    pub frames: Vec<Frame>,
}

impl Trace {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Load a trace written in either format.
///
/// Strict: an unreadable file, invalid JSON, a missing `meta`, or a frame
/// whose ids and cells disagree is an error.  The one tolerated defect is a
/// truncated final line in the line format.  Frames recorded without ids
/// get slot-index ids.
pub fn load(path: &Path) -> TraceResult<Trace> {
    match TraceFormat::from_path(path) {
        TraceFormat::Document => document::load(path),
        TraceFormat::Lines => lines::load(path),
    }
}

/// Build frame `index` from its on-disk parts.  Missing ids become slot ids.
pub(crate) fn decode_frame(
    path:  &Path,
    index: usize,
    ids:   Option<Vec<AgentId>>,
    cells: Vec<Cell>,
) -> TraceResult<Frame> {
    match ids {
        Some(ids) => Frame::new(ids, cells).map_err(|source| TraceError::Frame {
            path: path.to_path_buf(),
            index,
            source,
        }),
        None => Ok(Frame::from_slots(cells)),
    }
}
