//! `TraceRecorder<W>` — bridges `SimObserver` to a `TraceWriter`.

use cf_core::{Frame, Tick};
use cf_sim::{SimObserver, SimState};

use crate::{TraceError, TraceWriter};

/// A [`SimObserver`] that appends every frame to a [`TraceWriter`].
///
/// Errors from the writer are stored because `SimObserver` methods have no
/// return value.  After the first error no further frames are written, so
/// the file stays a valid prefix of the run.  After `sim.run()` returns,
/// check with [`take_error`][Self::take_error].
pub struct TraceRecorder<W: TraceWriter> {
    writer:     W,
    last_error: Option<TraceError>,
}

impl<W: TraceWriter> TraceRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).  Returns `None` if all writes
    /// succeeded.
    pub fn take_error(&mut self) -> Option<TraceError> {
        self.last_error.take()
    }

    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: TraceWriter> SimObserver for TraceRecorder<W> {
    fn on_frame(&mut self, _tick: Tick, frame: &Frame) {
        if self.last_error.is_some() {
            return;
        }
        if let Err(e) = self.writer.append(frame) {
            self.last_error = Some(e);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _state: SimState) {
        if self.last_error.is_some() {
            return;
        }
        if let Err(e) = self.writer.finish() {
            self.last_error = Some(e);
        }
    }
}
