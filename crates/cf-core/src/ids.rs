//! Stable agent identifier.
//!
//! An agent's slot in the active list shifts every time an earlier agent is
//! removed, so the slot can't serve as identity across frames.  `AgentId` is
//! assigned once at spawn and travels with the agent into every recorded
//! frame.  The inner integer is `pub` so IDs read from legacy traces (which
//! only carry slot order) can be synthesised as `AgentId(slot)`.

use std::fmt;

/// Opaque, spawn-assigned agent identifier.  `Copy + Ord + Hash` so it can be
/// used as a map key without ceremony.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AgentId(pub u32);

impl AgentId {
    /// Sentinel meaning "no valid ID", equal to `u32::MAX`.
    pub const INVALID: AgentId = AgentId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for AgentId {
    /// Returns the `INVALID` sentinel so uninitialised IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl From<AgentId> for usize {
    #[inline(always)]
    fn from(id: AgentId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for AgentId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<AgentId, Self::Error> {
        u32::try_from(n).map(AgentId)
    }
}
