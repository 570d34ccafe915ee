//! Undo/redo history — a bounded stack of full-state snapshots.
//!
//! RULE: One mutating command, one commit. Snapshots are explicit
//! structural deep copies taken at commit boundaries; selection state is
//! never part of a snapshot.

use crate::state::PlanState;

/// Maximum retained snapshots. Once full, commits evict the oldest entry
/// instead of advancing the index, so the pointer stays valid and the
/// effective undo depth never exceeds the bound.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<PlanState>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw away all history and start over from a single snapshot.
    /// Used after initial load, import, and every scenario operation.
    pub fn reset(&mut self, initial: PlanState) {
        self.stack = vec![initial];
        self.index = 0;
    }

    /// Push a snapshot. Any redo branch beyond the current index is
    /// discarded first.
    pub fn commit(&mut self, snapshot: PlanState) {
        if !self.stack.is_empty() && self.index + 1 < self.stack.len() {
            self.stack.truncate(self.index + 1);
        }
        self.stack.push(snapshot);
        if self.stack.len() > MAX_HISTORY {
            self.stack.remove(0);
        } else if self.stack.len() > 1 {
            self.index += 1;
        }
    }

    /// Step back one snapshot. None when already at the oldest entry.
    pub fn undo(&mut self) -> Option<PlanState> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.stack[self.index].clone())
    }

    /// Step forward one snapshot. None when already at the newest entry.
    pub fn redo(&mut self) -> Option<PlanState> {
        if self.index + 1 >= self.stack.len() {
            return None;
        }
        self.index += 1;
        Some(self.stack[self.index].clone())
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.stack.len()
    }
}
