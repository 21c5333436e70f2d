//! Linear undo/redo over whole-document snapshots.

use crate::document::Presentation;

/// Maximum number of snapshots kept, including the current one.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Snapshot list with a cursor at the current document.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Presentation>,
    cursor: usize,
    limit: usize,
}

impl History {
    pub fn new(initial: Presentation) -> Self {
        Self::with_limit(initial, MAX_UNDO_HISTORY)
    }

    /// History keeping at most `limit` snapshots (at least one).
    pub fn with_limit(initial: Presentation, limit: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &Presentation {
        &self.snapshots[self.cursor]
    }

    /// Record `doc` as the new current state, discarding any redo states.
    ///
    /// Returns `false` without recording anything when `doc` equals the current
    /// snapshot. The oldest snapshot is dropped once the limit is reached.
    pub fn commit(&mut self, doc: Presentation) -> bool {
        if doc == *self.current() {
            return false;
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(doc);
        if self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
        log::debug!("History commit: {} snapshot(s), cursor {}", self.snapshots.len(), self.cursor);
        true
    }

    /// Step back one snapshot. `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&Presentation> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Presentation> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Drop every snapshot but `doc`, e.g. after loading a file.
    pub fn reset(&mut self, doc: Presentation) {
        self.snapshots = vec![doc];
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{apply, Command};

    fn renamed(doc: &Presentation, name: &str) -> Presentation {
        let mut next = doc.clone();
        next.name = name.to_string();
        next
    }

    #[test]
    fn test_undo_redo_law() {
        let d = Presentation::new();
        let d2 = apply(&d, &Command::AddSlide { after: 0 });
        assert_ne!(d, d2);

        let mut history = History::new(d.clone());
        assert!(history.commit(d2.clone()));
        assert_eq!(history.undo(), Some(&d));
        assert_eq!(history.redo(), Some(&d2));
        assert_eq!(history.current(), &d2);
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let d = Presentation::new();
        let mut history = History::new(d.clone());
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.current(), &d);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_after_undo_cuts_branch() {
        let d = Presentation::new();
        let mut history = History::new(d.clone());
        history.commit(renamed(&d, "one"));
        history.commit(renamed(&d, "two"));
        history.undo();
        assert!(history.can_redo());

        history.commit(renamed(&d, "three"));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().name, "three");
        assert_eq!(history.undo().map(|p| p.name.as_str()), Some("one"));
    }

    #[test]
    fn test_equal_document_not_committed() {
        let d = Presentation::new();
        let mut history = History::new(d.clone());
        assert!(!history.commit(d.clone()));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let d = Presentation::new();
        let mut history = History::with_limit(d.clone(), 3);
        for i in 0..5 {
            history.commit(renamed(&d, &format!("v{i}")));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().name, "v4");
        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current().name, "v2");
    }
}
