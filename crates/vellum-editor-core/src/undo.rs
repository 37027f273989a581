//! Undo snapshots for structural edits.
//!
//! Structural list operations are coarse enough that whole-document
//! snapshots are the natural undo unit: a snapshot records the document
//! and caret as they were before a mutation, tagged with what caused it
//! and whether a following Backspace may undo it.

use vellum_model::{ContentModelDocument, InsertPoint};

/// What kind of edit produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    Keyboard,
    AutoBullet,
    ListOperation,
}

/// Pre-mutation state captured around a structural edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub document: ContentModelDocument,
    pub insert_point: InsertPoint,
    pub source: ChangeSource,
    /// Marks snapshots the host may pop with a plain Backspace right
    /// after the mutation (e.g. undoing an outdent-on-enter).
    pub can_undo_by_backspace: bool,
}

/// Bounded undo/redo stack pair. Recording a new edit clears the redo
/// side and evicts the oldest snapshot past `max_steps`.
pub struct SnapshotStack {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_steps: usize,
}

impl Default for SnapshotStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl SnapshotStack {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Record a fresh edit's pre-state.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    /// Re-stack a snapshot during redo without touching the redo side.
    pub fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
    }

    pub fn pop_undo(&mut self) -> Option<Snapshot> {
        self.undo_stack.pop()
    }

    pub fn push_redo(&mut self, snapshot: Snapshot) {
        self.redo_stack.push(snapshot);
    }

    pub fn pop_redo(&mut self) -> Option<Snapshot> {
        self.redo_stack.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The snapshot a Backspace-undo would pop, if it is eligible.
    pub fn undoable_by_backspace(&self) -> bool {
        self.undo_stack
            .last()
            .is_some_and(|snapshot| snapshot.can_undo_by_backspace)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_snapshot(marker: &str, can_undo_by_backspace: bool) -> Snapshot {
        use vellum_model::{Block, Paragraph};
        Snapshot {
            document: ContentModelDocument::from_blocks(vec![Block::Paragraph(
                Paragraph::from_text(marker),
            )]),
            insert_point: InsertPoint::at_start(vec![0]),
            source: ChangeSource::ListOperation,
            can_undo_by_backspace,
        }
    }

    #[test]
    fn test_record_clears_redo() {
        let mut stack = SnapshotStack::new(10);
        stack.record(make_snapshot("a", false));
        let popped = stack.pop_undo().unwrap();
        stack.push_redo(popped);
        assert!(stack.can_redo());

        stack.record(make_snapshot("b", false));
        assert!(!stack.can_redo());
        assert!(stack.can_undo());
    }

    #[test]
    fn test_max_steps_evicts_oldest() {
        let mut stack = SnapshotStack::new(2);
        stack.record(make_snapshot("a", false));
        stack.record(make_snapshot("b", false));
        stack.record(make_snapshot("c", false));
        assert!(stack.pop_undo().is_some());
        assert!(stack.pop_undo().is_some());
        assert!(stack.pop_undo().is_none());
    }

    #[test]
    fn test_undoable_by_backspace_peeks_top() {
        let mut stack = SnapshotStack::new(10);
        assert!(!stack.undoable_by_backspace());
        stack.record(make_snapshot("a", true));
        assert!(stack.undoable_by_backspace());
        stack.record(make_snapshot("b", false));
        assert!(!stack.undoable_by_backspace());
    }
}
