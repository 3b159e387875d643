//! The replay cursor and its accumulation rules.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use cf_core::{AgentId, Cell, Frame};

use crate::{AnalysisError, AnalysisResult, Heatmap};

/// One agent's movement between two consecutive observed frames, recorded
/// after baking when both frames hold the same number of agents and the
/// destination is a heavily "stuck" cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct StuckVector {
    pub from: Cell,
    pub to:   Cell,
}

/// Replays a trace to build density and stuck heatmaps.
///
/// The analyzer owns its frames and cursor; nothing is global, so several
/// analyzers can replay different traces side by side.  Only
/// [`advance`](Self::advance) accumulates: moving the cursor with
/// [`step`](Self::step) never counts a frame.
pub struct CongestionAnalyzer {
    frames:  Vec<Frame>,
    cursor:  usize,
    density: Heatmap,
    stuck:   Heatmap,
    baked:   bool,
    /// Positions in the previously observed frame, by agent.
    prev:    Option<FxHashMap<AgentId, Cell>>,
    vectors: FxHashSet<StuckVector>,
}

impl CongestionAnalyzer {
    /// Check every frame against the grid and start at frame 0.
    pub fn new(frames: Vec<Frame>, grid_size: (u32, u32)) -> AnalysisResult<Self> {
        if frames.is_empty() {
            return Err(AnalysisError::EmptyTrace);
        }
        let (width, height) = grid_size;
        for (frame, f) in frames.iter().enumerate() {
            if let Some(&cell) = f.cells.iter().find(|c| c.x >= width || c.y >= height) {
                return Err(AnalysisError::CellOutOfBounds { frame, cell, width, height });
            }
        }
        debug!(frames = frames.len(), width, height, "analyzer ready");
        Ok(Self {
            frames,
            cursor:  0,
            density: Heatmap::new(width, height),
            stuck:   Heatmap::new(width, height),
            baked:   false,
            prev:    None,
            vectors: FxHashSet::default(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_index(&self) -> usize {
        self.cursor
    }

    /// The frame under the cursor.
    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.cursor]
    }

    /// `true` once a full pass has completed; the maps are frozen until
    /// [`reset`](Self::reset).
    pub fn is_baked(&self) -> bool {
        self.baked
    }

    pub fn density(&self) -> &Heatmap {
        &self.density
    }

    pub fn stuck(&self) -> &Heatmap {
        &self.stuck
    }

    /// Deduplicated stuck vectors in sorted order.
    pub fn stuck_vectors(&self) -> Vec<StuckVector> {
        let mut v: Vec<StuckVector> = self.vectors.iter().copied().collect();
        v.sort_unstable();
        v
    }

    // ── Cursor ────────────────────────────────────────────────────────────

    /// Move the cursor by `delta` frames, wrapping at both ends.  A forward
    /// move that wraps past the last frame bakes the maps.
    pub fn step(&mut self, delta: isize) {
        let n = self.frames.len();
        let target = self.cursor as isize + delta;
        if delta > 0 && target >= n as isize && !self.baked {
            self.baked = true;
            info!(
                frames = n,
                max_density = self.density.max(),
                max_stuck = self.stuck.max(),
                "replay pass complete; heatmaps baked"
            );
        }
        self.cursor = target.rem_euclid(n as isize) as usize;
    }

    /// Observe the frame under the cursor, then step forward one frame.
    pub fn advance(&mut self) {
        self.observe(self.cursor);
        self.step(1);
    }

    /// Advance until the current pass completes.  No-op once baked.
    pub fn run_pass(&mut self) {
        while !self.baked {
            self.advance();
        }
    }

    /// Zero both maps, forget stuck vectors and the previous frame, and
    /// rewind to frame 0.
    pub fn reset(&mut self) {
        self.density.clear();
        self.stuck.clear();
        self.vectors.clear();
        self.baked = false;
        self.prev = None;
        self.cursor = 0;
        debug!("analyzer reset");
    }

    // ── Accumulation ──────────────────────────────────────────────────────

    fn observe(&mut self, index: usize) {
        let frame = &self.frames[index];
        let current: FxHashMap<AgentId, Cell> = frame.iter().collect();

        if !self.baked {
            for (id, cell) in frame.iter() {
                self.density.increment(cell);
                if self.prev.as_ref().and_then(|p| p.get(&id)) == Some(&cell) {
                    self.stuck.increment(cell);
                }
            }
        } else if let Some(prev) = &self.prev {
            // Vectors are only taken between frames with the same occupant
            // count; an empty stuck map has no hotspots.
            let max = self.stuck.max();
            if max > 0 && prev.len() == frame.len() {
                let threshold = f64::from(max) / 2.0;
                for (id, cell) in frame.iter() {
                    let Some(&from) = prev.get(&id) else { continue };
                    if f64::from(self.stuck.get(cell)) >= threshold {
                        self.vectors.insert(StuckVector { from, to: cell });
                    }
                }
            }
        }

        self.prev = Some(current);
    }
}
