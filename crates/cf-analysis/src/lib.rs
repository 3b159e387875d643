//! `cf-analysis` — congestion analytics over a recorded trace.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`heatmap`]  | `Heatmap`: integer grid with a cached maximum             |
//! | [`analyzer`] | `CongestionAnalyzer`, `StuckVector`: the replay cursor    |
//! | [`export`]   | CSV export of heatmaps and stuck vectors                  |
//! | [`error`]    | `AnalysisError`, `AnalysisResult<T>`                      |
//!
//! # Replay model
//!
//! ```text
//! advance():  observe frame[cursor]  →  step(+1)
//!             (wrapping past the last frame bakes both maps)
//!
//! observe, not baked:  density[c] += 1 per occupant
//!                      stuck[c]   += 1 per agent whose cell is unchanged
//!                                      since the previously observed frame
//! observe, baked:      record prev → cur vectors for agents on cells with
//!                      stuck[c] >= max_stuck / 2
//! ```

pub mod analyzer;
pub mod error;
pub mod export;
pub mod heatmap;


pub use analyzer::{CongestionAnalyzer, StuckVector};
pub use error::{AnalysisError, AnalysisResult};
pub use export::{ExportPaths, export, write_heatmap_csv, write_stuck_vectors_csv};
pub use heatmap::Heatmap;
