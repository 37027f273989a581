//! The editor seam: host surface trait and a plain implementation.
//!
//! `Editor` is the contract the feature layer is written against. It
//! separates what a host must store (document, caret, selection, flags)
//! from what the features derive (structure queries, undo scoping,
//! deferred work). `PlainEditor` is the field-based implementation; a
//! reactive host can implement the trait over its own storage and reuse
//! every provided method.

use vellum_model::{
    BlockPath, ContentModelDocument, InsertPoint, ListStyleType, Paragraph, path_in_range,
    read_list_metadata,
};

use crate::deferred::{DeferredQueue, DeferredTask};
use crate::undo::{ChangeSource, Snapshot, SnapshotStack};

/// Expanded selection as a pair of insert points in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: InsertPoint,
    pub end: InsertPoint,
}

impl SelectionRange {
    /// Build a selection, swapping the ends into document order.
    pub fn new(a: InsertPoint, b: InsertPoint) -> Self {
        if (&b.path, b.offset) < (&a.path, a.offset) {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }
}

/// Feature gates for the experimental auto-format triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentalFlags {
    pub auto_bullet_list: bool,
    pub auto_numbering_list: bool,
}

/// Which gate a feature asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentalFlag {
    AutoBulletList,
    AutoNumberingList,
}

/// Host surface contract for the list feature layer.
pub trait Editor {
    // === Required: document access ===

    fn document(&self) -> &ContentModelDocument;

    fn document_mut(&mut self) -> &mut ContentModelDocument;

    // === Required: cursor/selection state ===

    fn insert_point(&self) -> InsertPoint;

    fn set_insert_point(&mut self, point: InsertPoint);

    fn selection(&self) -> Option<SelectionRange>;

    fn set_selection(&mut self, selection: Option<SelectionRange>);

    // === Required: host services ===

    fn is_feature_enabled(&self, flag: ExperimentalFlag) -> bool;

    fn snapshot_stack(&self) -> &SnapshotStack;

    fn snapshot_stack_mut(&mut self) -> &mut SnapshotStack;

    fn deferred(&mut self) -> &mut DeferredQueue;

    // === Provided: structure queries ===

    /// Path of the list item enclosing the caret, if any.
    fn list_item_path_at_cursor(&self) -> Option<BlockPath> {
        self.document()
            .list_item_ancestor(&self.insert_point().path)
    }

    fn paragraph_at_cursor(&self) -> Option<&Paragraph> {
        let point = self.insert_point();
        self.document().paragraph_at(&point.path)
    }

    fn at_paragraph_start(&self) -> bool {
        self.insert_point().offset == 0
    }

    fn at_paragraph_end(&self) -> bool {
        let point = self.insert_point();
        self.document()
            .paragraph_at(&point.path)
            .is_some_and(|paragraph| point.offset >= paragraph.char_len())
    }

    /// Whether any list item intersects the current selection (or holds
    /// the caret, for a collapsed selection).
    fn selection_intersects_list(&self) -> bool {
        match self.selection() {
            Some(selection) => self
                .document()
                .list_item_paths()
                .iter()
                .any(|path| path_in_range(path, &selection.start.path, &selection.end.path)),
            None => self.list_item_path_at_cursor().is_some(),
        }
    }

    // === Provided: undo scoping ===

    /// Run a structural mutation inside an undo snapshot. The snapshot
    /// records the pre-mutation state and is committed up front, so it
    /// survives every exit path of the mutator.
    fn add_undo_snapshot(
        &mut self,
        source: ChangeSource,
        can_undo_by_backspace: bool,
        mutator: impl FnOnce(&mut Self),
    ) where
        Self: Sized,
    {
        let snapshot = Snapshot {
            document: self.document().clone(),
            insert_point: self.insert_point(),
            source,
            can_undo_by_backspace,
        };
        self.snapshot_stack_mut().record(snapshot);
        mutator(self);
    }

    fn undo(&mut self) -> bool
    where
        Self: Sized,
    {
        let Some(snapshot) = self.snapshot_stack_mut().pop_undo() else {
            return false;
        };
        let current = Snapshot {
            document: self.document().clone(),
            insert_point: self.insert_point(),
            source: snapshot.source,
            can_undo_by_backspace: snapshot.can_undo_by_backspace,
        };
        self.snapshot_stack_mut().push_redo(current);
        *self.document_mut() = snapshot.document;
        self.set_insert_point(snapshot.insert_point);
        self.set_selection(None);
        true
    }

    fn redo(&mut self) -> bool
    where
        Self: Sized,
    {
        let Some(snapshot) = self.snapshot_stack_mut().pop_redo() else {
            return false;
        };
        let current = Snapshot {
            document: self.document().clone(),
            insert_point: self.insert_point(),
            source: snapshot.source,
            can_undo_by_backspace: snapshot.can_undo_by_backspace,
        };
        self.snapshot_stack_mut().push_undo(current);
        *self.document_mut() = snapshot.document;
        self.set_insert_point(snapshot.insert_point);
        self.set_selection(None);
        true
    }

    // === Provided: deferred work ===

    fn schedule(&mut self, task: DeferredTask) {
        self.deferred().schedule(task);
    }

    fn take_deferred(&mut self) -> Option<DeferredTask> {
        self.deferred().take()
    }
}

/// Current list style at the caret, for toolbar state. Falls back to the
/// style persisted in the level's dataset when none is set on the format.
pub fn get_list_style_type<E: Editor>(editor: &E) -> Option<ListStyleType> {
    let path = editor.list_item_path_at_cursor()?;
    let item = editor.document().block_at(&path)?.as_list_item()?;
    let level = item.levels.last()?;
    level.format.list_style_type.or_else(|| {
        read_list_metadata(&level.dataset)
            .and_then(|metadata| metadata.style_for(level.list_type))
    })
}

/// Simple field-based implementation of `Editor`.
///
/// Stores the document, caret, selection, flags, undo stack, and the
/// deferred slot as plain fields. Use this for non-reactive hosts or as
/// a base for testing.
pub struct PlainEditor {
    document: ContentModelDocument,
    insert_point: InsertPoint,
    selection: Option<SelectionRange>,
    flags: ExperimentalFlags,
    snapshots: SnapshotStack,
    deferred: DeferredQueue,
}

impl PlainEditor {
    pub fn new(document: ContentModelDocument) -> Self {
        Self {
            document,
            insert_point: InsertPoint::at_start(vec![0]),
            selection: None,
            flags: ExperimentalFlags::default(),
            snapshots: SnapshotStack::default(),
            deferred: DeferredQueue::new(),
        }
    }

    pub fn with_flags(mut self, flags: ExperimentalFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn flags(&self) -> ExperimentalFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut ExperimentalFlags {
        &mut self.flags
    }
}

impl Editor for PlainEditor {
    fn document(&self) -> &ContentModelDocument {
        &self.document
    }

    fn document_mut(&mut self) -> &mut ContentModelDocument {
        &mut self.document
    }

    fn insert_point(&self) -> InsertPoint {
        self.insert_point.clone()
    }

    fn set_insert_point(&mut self, point: InsertPoint) {
        self.insert_point = point;
    }

    fn selection(&self) -> Option<SelectionRange> {
        self.selection.clone()
    }

    fn set_selection(&mut self, selection: Option<SelectionRange>) {
        self.selection = selection;
    }

    fn is_feature_enabled(&self, flag: ExperimentalFlag) -> bool {
        match flag {
            ExperimentalFlag::AutoBulletList => self.flags.auto_bullet_list,
            ExperimentalFlag::AutoNumberingList => self.flags.auto_numbering_list,
        }
    }

    fn snapshot_stack(&self) -> &SnapshotStack {
        &self.snapshots
    }

    fn snapshot_stack_mut(&mut self) -> &mut SnapshotStack {
        &mut self.snapshots
    }

    fn deferred(&mut self) -> &mut DeferredQueue {
        &mut self.deferred
    }
}
