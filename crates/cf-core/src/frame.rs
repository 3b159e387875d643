//! One tick's snapshot of every active agent.
//!
//! Stored Structure-of-Arrays: `ids[i]` and `cells[i]` describe the agent in
//! slot `i`.  Slot order is the scheduler's processing order for that tick
//! and is preserved exactly through the trace.

use crate::{AgentId, Cell, CoreError, CoreResult};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub ids:   Vec<AgentId>,
    pub cells: Vec<Cell>,
}

impl Frame {
    /// Pair up IDs and cells.  Fails if the two lists differ in length.
    pub fn new(ids: Vec<AgentId>, cells: Vec<Cell>) -> CoreResult<Self> {
        if ids.len() != cells.len() {
            return Err(CoreError::FrameShape { ids: ids.len(), cells: cells.len() });
        }
        Ok(Self { ids, cells })
    }

    /// Build a frame from positions alone, using slot index as identity.
    ///
    /// This is how frames from traces written without IDs are read back; the
    /// resulting analytics match slot-keyed (legacy) behaviour.
    pub fn from_slots(cells: Vec<Cell>) -> Self {
        let ids = (0..cells.len() as u32).map(AgentId).collect();
        Self { ids, cells }
    }

    pub fn push(&mut self, id: AgentId, cell: Cell) {
        self.ids.push(id);
        self.cells.push(cell);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(AgentId, Cell)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, Cell)> + '_ {
        self.ids.iter().copied().zip(self.cells.iter().copied())
    }

    /// `true` if the IDs are exactly `0..len` in order, i.e. the frame
    /// carries no information beyond slot order.
    pub fn has_slot_ids(&self) -> bool {
        self.ids.iter().enumerate().all(|(i, id)| id.index() == i)
    }
}
