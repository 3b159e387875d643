//! Simulation time.
//!
//! Time is a monotonically increasing `Tick` counter.  One tick is one
//! scheduler step and one trace frame; there is no wall-clock mapping, the
//! external loop decides pacing.

use std::fmt;

/// An absolute simulation tick counter.  A sim starts at tick 0, and the
/// frame recorded during tick `n` holds the positions after that tick's
/// moves, so the first recorded frame belongs to tick 0.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
