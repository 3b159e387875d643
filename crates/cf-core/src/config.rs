//! Simulation configuration.
//!
//! Plain structs with sensible defaults.  The application crate fills them
//! from command-line flags or a JSON parameter file (`serde` feature) and
//! hands them to `cf-sim`.

use crate::{CoreError, CoreResult};

/// Agents closer than this (Euclidean, in cells) to the goal are removed at
/// the end of the tick.
pub const DEFAULT_REMOVAL_RADIUS: f64 = 3.0;

/// Default master seed.
pub const DEFAULT_SEED: u64 = 42;

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level scheduler configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical spawns.
    pub seed: u64,

    /// Removal radius around the goal, in cells.  Default: 3.0.
    pub removal_radius: f64,

    /// Stop after this many ticks even if agents remain.  `None` runs until
    /// the active set is empty, which never happens if some agent's goal is
    /// unreachable.
    pub max_ticks: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:           DEFAULT_SEED,
            removal_radius: DEFAULT_REMOVAL_RADIUS,
            max_ticks:      None,
        }
    }
}

impl SimConfig {
    /// Reject configurations that would make the run meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.removal_radius.is_finite() || self.removal_radius < 0.0 {
            return Err(CoreError::Config(format!(
                "removal radius must be a finite non-negative number, got {}",
                self.removal_radius
            )));
        }
        Ok(())
    }
}

// ── SpawnRect ─────────────────────────────────────────────────────────────────

/// Axis-aligned region agents are sampled from.  Bounds are inclusive on both
/// ends: a rect `(x, y, w, h)` covers `x..=x+w` by `y..=y+h`.
///
/// Serialised as `[x, y, w, h]`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[u32; 4]", into = "[u32; 4]"))]
pub struct SpawnRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SpawnRect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive x range.
    pub fn x_range(&self) -> std::ops::RangeInclusive<u32> {
        self.x..=self.x.saturating_add(self.w)
    }

    /// Inclusive y range.
    pub fn y_range(&self) -> std::ops::RangeInclusive<u32> {
        self.y..=self.y.saturating_add(self.h)
    }
}

impl From<[u32; 4]> for SpawnRect {
    fn from([x, y, w, h]: [u32; 4]) -> Self {
        SpawnRect { x, y, w, h }
    }
}

impl From<SpawnRect> for [u32; 4] {
    fn from(r: SpawnRect) -> Self {
        [r.x, r.y, r.w, r.h]
    }
}
