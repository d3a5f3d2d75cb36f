//! Bounded linear undo/redo ring.

use std::collections::VecDeque;

use crate::types::PositionSnapshot;

/// Default number of retained entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Linear undo history of position snapshots.
///
/// ## Invariants
///
/// - `len() <= capacity()`
/// - `index() < len()` whenever the stack is non-empty
///
/// Pushing after an undo truncates the redo branch; there is no undo tree.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<PositionSnapshot>,
    index: usize,
    capacity: usize,
}

impl HistoryStack {
    /// Create an empty stack holding at most `capacity` entries.
    ///
    /// A zero capacity is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Append a snapshot after the current entry.
    pub fn push(&mut self, snapshot: PositionSnapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry and return it.
    ///
    /// At index 0 the first entry is returned again without moving. This
    /// re-applies the oldest state instead of reporting "nothing to undo";
    /// callers that care check [`can_undo`](Self::can_undo) first.
    pub fn undo(&mut self) -> Option<&PositionSnapshot> {
        if self.entries.is_empty() {
            return None;
        }
        if self.index > 0 {
            self.index -= 1;
        }
        self.entries.get(self.index)
    }

    /// Step forward one entry and return it, or `None` at the tail.
    pub fn redo(&mut self) -> Option<&PositionSnapshot> {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            self.entries.get(self.index)
        } else {
            None
        }
    }

    /// The entry the pointer is on.
    pub fn current(&self) -> Option<&PositionSnapshot> {
        self.entries.get(self.index)
    }

    /// True if `undo` would move the pointer.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// True if `redo` would move the pointer.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Current pointer.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the bound. Shrinking evicts the oldest entries; the pointer
    /// stays on the same snapshot while that snapshot survives.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.index = self.index.saturating_sub(1);
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodePosition;

    fn snap(x: f64) -> PositionSnapshot {
        PositionSnapshot::new().with("n", NodePosition::free(x, 0.0))
    }

    fn x_of(s: &PositionSnapshot) -> f64 {
        s.iter().next().map(|(_, p)| p.x).unwrap_or(f64::NAN)
    }

    #[test]
    fn test_empty() {
        let mut h = HistoryStack::default();
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
        assert!(h.current().is_none());
    }

    #[test]
    fn test_undo_returns_previous_state() {
        let mut h = HistoryStack::default();
        h.push(snap(1.0));
        h.push(snap(2.0));
        assert_eq!(x_of(h.undo().unwrap()), 1.0);
        assert_eq!(h.index(), 0);
    }

    #[test]
    fn test_undo_at_zero_returns_first_entry() {
        let mut h = HistoryStack::default();
        h.push(snap(1.0));
        assert!(!h.can_undo());
        assert_eq!(x_of(h.undo().unwrap()), 1.0);
        assert_eq!(x_of(h.undo().unwrap()), 1.0);
        assert_eq!(h.index(), 0);
    }

    #[test]
    fn test_redo_at_tail_is_noop() {
        let mut h = HistoryStack::default();
        h.push(snap(1.0));
        h.push(snap(2.0));
        assert!(h.redo().is_none());
        assert_eq!(h.index(), 1);
    }

    #[test]
    fn test_push_truncates_redo_branch() {
        let mut h = HistoryStack::default();
        h.push(snap(1.0));
        h.push(snap(2.0));
        h.push(snap(3.0));
        h.undo();
        h.undo();
        h.push(snap(9.0));
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(x_of(h.current().unwrap()), 9.0);
        assert_eq!(x_of(h.undo().unwrap()), 1.0);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut h = HistoryStack::new(3);
        for i in 0..5 {
            h.push(snap(i as f64));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), 2);
        assert_eq!(x_of(h.undo().unwrap()), 3.0);
        assert_eq!(x_of(h.undo().unwrap()), 2.0);
        assert_eq!(x_of(h.undo().unwrap()), 2.0);
    }

    #[test]
    fn test_shrink_capacity_keeps_pointer_entry() {
        let mut h = HistoryStack::new(10);
        for i in 0..6 {
            h.push(snap(i as f64));
        }
        h.undo();
        h.set_capacity(3);
        assert_eq!(h.len(), 3);
        assert_eq!(h.capacity(), 3);
        assert_eq!(x_of(h.current().unwrap()), 4.0);
        assert_eq!(x_of(h.redo().unwrap()), 5.0);

        h.set_capacity(0);
        assert_eq!(h.len(), 1);
        assert_eq!(x_of(h.current().unwrap()), 5.0);
    }

    #[test]
    fn test_undo_redo_restores() {
        let mut h = HistoryStack::default();
        for i in 0..4 {
            h.push(snap(i as f64));
        }
        h.undo();
        let before = h.current().cloned();
        h.undo();
        let redone = h.redo().cloned();
        assert_eq!(before, redone);
    }
}
