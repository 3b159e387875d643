//! The `TraceWriter` trait implemented by both trace formats.

use std::path::Path;

use cf_core::Frame;

use crate::{JsonLinesTraceWriter, JsonTraceWriter, SimulationMeta, TraceError, TraceFormat, TraceResult};

/// When buffered frames reach the disk.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Durability {
    /// Every append is flushed to the OS before `append` returns.
    #[default]
    PerTick,
    /// Buffer up to `n` frames; flush when the buffer fills and on `finish`.
    /// A crash loses at most the buffered frames.
    Batched(usize),
}

impl Durability {
    /// Frames held in memory before a flush.
    pub(crate) fn batch_len(self) -> usize {
        match self {
            Durability::PerTick => 1,
            Durability::Batched(n) => n,
        }
    }
}

/// Writer configuration.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TraceOptions {
    pub durability: Durability,
}

impl TraceOptions {
    pub fn validate(&self) -> TraceResult<()> {
        if self.durability == Durability::Batched(0) {
            return Err(TraceError::Config("batch size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Append-only sink for one trace file.  One writer per file.
pub trait TraceWriter {
    /// Record one tick's frame.  The metadata was supplied at construction.
    fn append(&mut self, frame: &Frame) -> TraceResult<()>;

    /// Flush buffered frames.  The file exists afterwards even if no frame
    /// was ever appended.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> TraceResult<()>;

    /// Frames accepted so far, flushed or not.
    fn frames_appended(&self) -> usize;
}

impl<W: TraceWriter + ?Sized> TraceWriter for Box<W> {
    fn append(&mut self, frame: &Frame) -> TraceResult<()> {
        (**self).append(frame)
    }

    fn finish(&mut self) -> TraceResult<()> {
        (**self).finish()
    }

    fn frames_appended(&self) -> usize {
        (**self).frames_appended()
    }
}

/// Open a writer for `path`, picking the format from its extension.
///
/// Nothing is written until the first flush; an existing file at `path` is
/// replaced at that point.
pub fn create(
    path:    &Path,
    meta:    SimulationMeta,
    options: TraceOptions,
) -> TraceResult<Box<dyn TraceWriter>> {
    options.validate()?;
    Ok(match TraceFormat::from_path(path) {
        TraceFormat::Document => Box::new(JsonTraceWriter::new(path, meta, options.durability)),
        TraceFormat::Lines => Box::new(JsonLinesTraceWriter::new(path, meta, options.durability)),
    })
}
