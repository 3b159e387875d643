//! `cf-trace` — durable simulation traces.
//!
//! Two on-disk formats are provided, chosen by file extension:
//!
//! | Extension | Format        | Append cost | Writer                    |
//! |-----------|---------------|-------------|---------------------------|
//! | `.json`   | JSON document | O(frames)   | [`JsonTraceWriter`]       |
//! | `.jsonl`  | JSON lines    | O(1)        | [`JsonLinesTraceWriter`]  |
//!
//! Both implement [`TraceWriter`] and are driven during a run by
//! [`TraceRecorder`], which implements `cf_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cf_trace::{TraceOptions, TraceRecorder, create};
//!
//! let writer = create(Path::new("run.jsonl"), meta, TraceOptions::default())?;
//! let mut rec = TraceRecorder::new(writer);
//! sim.run(&mut rec)?;
//! if let Some(e) = rec.take_error() { return Err(e.into()); }
//!
//! let trace = cf_trace::load(Path::new("run.jsonl"))?;
//! ```

pub mod document;
pub mod error;
pub mod lines;
pub mod meta;
pub mod recorder;
pub mod trace;
pub mod writer;

#[cfg(test)]
mod tests;

pub use document::JsonTraceWriter;
pub use error::{TraceError, TraceResult};
pub use lines::JsonLinesTraceWriter;
pub use meta::SimulationMeta;
pub use recorder::TraceRecorder;
pub use trace::{Trace, TraceFormat, load};
pub use writer::{Durability, TraceOptions, TraceWriter, create};
