//! Per-keystroke memoized lookups.
//!
//! Several feature predicates evaluate against the same event, so the
//! lookups they share are memoized in an `EventContext` with one named
//! field per cached question. The context lives for exactly one event:
//! the dispatcher creates it before evaluating predicates and drops it
//! when the event is done. Predicates may fill it; only the dispatched
//! action mutates the document.

use vellum_model::{BlockPath, ListStyleType, read_list_metadata};

use crate::editor::Editor;
use crate::infer::{InferredListStyle, MARKER_WINDOW, infer_list_style};

/// Memo table for one key event.
#[derive(Debug, Default)]
pub struct EventContext {
    list_item_path: Option<Option<BlockPath>>,
    text_before_cursor: Option<String>,
    entity_before_cursor: Option<bool>,
    previous_list_style: Option<Option<ListStyleType>>,
    inferred_list_style: Option<Option<InferredListStyle>>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the list item enclosing the caret, if any.
    pub fn list_item_path<E: Editor>(&mut self, editor: &E) -> Option<BlockPath> {
        self.list_item_path
            .get_or_insert_with(|| editor.list_item_path_at_cursor())
            .clone()
    }

    /// Text of the caret's paragraph before the caret.
    pub fn text_before_cursor<E: Editor>(&mut self, editor: &E) -> &str {
        if self.text_before_cursor.is_none() {
            let point = editor.insert_point();
            let text = editor
                .document()
                .paragraph_at(&point.path)
                .map(|paragraph| paragraph.text_before(point.offset))
                .unwrap_or_default();
            self.text_before_cursor = Some(text);
        }
        self.text_before_cursor.as_deref().unwrap_or("")
    }

    /// Whether a non-text inline element precedes the caret.
    pub fn has_entity_before_cursor<E: Editor>(&mut self, editor: &E) -> bool {
        *self.entity_before_cursor.get_or_insert_with(|| {
            let point = editor.insert_point();
            editor
                .document()
                .paragraph_at(&point.path)
                .is_some_and(|paragraph| paragraph.has_entity_before(point.offset))
        })
    }

    /// Style of the list item immediately preceding the caret's block, if
    /// that sibling is a list item. Used for style-continuity tie-breaks.
    pub fn previous_list_style<E: Editor>(&mut self, editor: &E) -> Option<ListStyleType> {
        if self.previous_list_style.is_none() {
            self.previous_list_style = Some(compute_previous_list_style(editor));
        }
        self.previous_list_style.flatten()
    }

    /// Outcome of style inference over the text before the caret, with
    /// the trigger preconditions (not in a list, no entity, no
    /// whitespace, within the window) already applied.
    pub fn inferred_list_style<E: Editor>(&mut self, editor: &E) -> Option<InferredListStyle> {
        if self.inferred_list_style.is_none() {
            let inferred = self.compute_inferred_style(editor);
            self.inferred_list_style = Some(inferred);
        }
        self.inferred_list_style.flatten()
    }

    fn compute_inferred_style<E: Editor>(&mut self, editor: &E) -> Option<InferredListStyle> {
        if self.list_item_path(editor).is_some() {
            return None;
        }
        if self.has_entity_before_cursor(editor) {
            return None;
        }
        let text = self.text_before_cursor(editor);
        if text.is_empty()
            || text.chars().count() > MARKER_WINDOW
            || text.chars().any(char::is_whitespace)
        {
            return None;
        }
        let marker = text.to_owned();
        let previous = self.previous_list_style(editor);
        infer_list_style(&marker, previous)
    }
}

fn compute_previous_list_style<E: Editor>(editor: &E) -> Option<ListStyleType> {
    let point = editor.insert_point();
    let (&index, parent) = point.path.split_last()?;
    if index == 0 {
        return None;
    }
    let blocks = editor.document().blocks_of(parent)?;
    let item = blocks.get(index - 1)?.as_list_item()?;
    let level = item.levels.first()?;
    level.format.list_style_type.or_else(|| {
        read_list_metadata(&level.dataset)
            .and_then(|metadata| metadata.style_for(level.list_type))
    })
}
