//! Undo/redo history
//!
//! A linear stack of immutable snapshots with a cursor. Pushing after an
//! undo abandons the redo branch; there is no tree of alternatives.
//!
//! Snapshots are held as `Arc<T>`, so handing one back to the caller never
//! copies pixel data. An optional retention limit evicts the oldest snapshot
//! once the stack would grow past it; undo then reaches back at most
//! `limit - 1` steps.

use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: VecDeque<Arc<T>>,
    cursor: usize,
    limit: Option<usize>,
}

impl<T> History<T> {
    /// Unbounded history starting at `initial`
    pub fn new(initial: T) -> Self {
        Self::from_shared(Arc::new(initial), None)
    }

    /// History that retains at most `limit` snapshots (minimum 1)
    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self::from_shared(Arc::new(initial), Some(limit))
    }

    pub fn from_shared(initial: Arc<T>, limit: Option<usize>) -> Self {
        Self {
            snapshots: VecDeque::from([initial]),
            cursor: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Discard everything and start over from `initial`
    pub fn reset(&mut self, initial: T) {
        self.snapshots.clear();
        self.snapshots.push_back(Arc::new(initial));
        self.cursor = 0;
    }

    /// Record a new snapshot after the cursor, dropping any redo branch
    pub fn push(&mut self, snapshot: T) {
        self.push_shared(Arc::new(snapshot));
    }

    /// Like `push`, for a snapshot that is already shared elsewhere
    pub fn push_shared(&mut self, snapshot: Arc<T>) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);

        if let Some(limit) = self.limit {
            while self.snapshots.len() > limit {
                self.snapshots.pop_front();
            }
        }

        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. `None` (and no change) at the oldest entry.
    pub fn undo(&mut self) -> Option<Arc<T>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(Arc::clone(&self.snapshots[self.cursor]))
    }

    /// Step forward one snapshot. `None` (and no change) at the newest entry.
    pub fn redo(&mut self) -> Option<Arc<T>> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(Arc::clone(&self.snapshots[self.cursor]))
    }

    pub fn current(&self) -> &Arc<T> {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history holds at least its initial snapshot
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(snapshot: Option<Arc<&'static str>>) -> Option<&'static str> {
        snapshot.map(|s| *s)
    }

    #[test]
    fn test_undo_redo_sequence() {
        let mut history = History::new("A");
        history.push("B");
        history.push("C");
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);

        assert_eq!(value(history.undo()), Some("B"));
        assert_eq!(value(history.undo()), Some("A"));
        assert_eq!(value(history.undo()), None);
        assert_eq!(history.cursor(), 0);

        assert_eq!(value(history.redo()), Some("B"));
        assert_eq!(**history.current(), "B");
    }

    #[test]
    fn test_push_discards_redo_branch() {
        let mut history = History::new("A");
        history.push("B");
        history.push("C");
        history.undo();
        history.push("D");

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(value(history.redo()), None);
        assert_eq!(**history.current(), "D");
        assert_eq!(value(history.undo()), Some("B"));
        assert_eq!(value(history.undo()), Some("A"));
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(1);
        history.push(2);
        history.push(3);
        history.reset(10);

        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(**history.current(), 10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.is_empty());
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::with_limit(0, 3);
        for i in 1..=5 {
            history.push(i);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(**history.current(), 5);
        assert_eq!(history.undo().map(|s| *s), Some(4));
        assert_eq!(history.undo().map(|s| *s), Some(3));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_limit_after_undo_keeps_cursor_on_new_entry() {
        let mut history = History::with_limit(0, 2);
        history.push(1);
        history.undo();
        history.push(2);

        assert_eq!(history.len(), 2);
        assert_eq!(**history.current(), 2);
        assert_eq!(history.undo().map(|s| *s), Some(0));
    }

    #[test]
    fn test_zero_limit_clamped() {
        let mut history = History::with_limit("A", 0);
        history.push("B");
        assert_eq!(history.limit(), Some(1));
        assert_eq!(history.len(), 1);
        assert_eq!(**history.current(), "B");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_snapshots_are_shared() {
        let mut history = History::new(vec![0u8; 16]);
        history.push(vec![1u8; 16]);
        let undone = history.undo().unwrap();
        assert!(Arc::ptr_eq(&undone, history.current()));
    }
}
