//! Delete-selection list collapse.
//!
//! After a range deletion removes a list item's only content, the item
//! may need to stop behaving as a list: "deleted from inside the first
//! item through to a blank line" demotes the item to plain content. Only
//! the level stack is cleared here; re-homing the demoted block is the
//! normalization pass's job.

use vellum_model::{Block, BlockPath, ContentModelDocument, InsertPoint, path_in_range};

/// What kind of deletion just ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteKind {
    /// A simple caret delete (Backspace/Delete with no selection).
    Caret,
    /// An expanded selection was removed.
    Range,
}

/// The context a range deletion leaves behind: where the caret landed and
/// what the selection spanned before the content was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteContext {
    pub insert_point: InsertPoint,
    pub kind: DeleteKind,
    /// Pre-deletion selection bounds, as block paths.
    pub selection_start: BlockPath,
    pub selection_end: BlockPath,
}

/// Strip the nesting levels of the list item the deletion landed in, when
/// the deletion consumed the item's content from its front edge.
///
/// Collapses iff all of:
/// - the deletion was a range delete,
/// - a list item encloses the insert point and overlapped the selection,
/// - the item has no previous sibling, or that sibling overlapped too,
/// - a next sibling exists and is recursively empty.
///
/// Returns whether the item was demoted.
pub fn collapse_deleted_list_item(doc: &mut ContentModelDocument, ctx: &DeleteContext) -> bool {
    if ctx.kind != DeleteKind::Range {
        return false;
    }
    let Some(item_path) = doc.list_item_ancestor(&ctx.insert_point.path) else {
        return false;
    };
    if !path_in_range(&item_path, &ctx.selection_start, &ctx.selection_end) {
        return false;
    }
    let Some((&index, parent)) = item_path.split_last() else {
        return false;
    };

    if index > 0 {
        let mut previous_path = parent.to_vec();
        previous_path.push(index - 1);
        if !path_in_range(&previous_path, &ctx.selection_start, &ctx.selection_end) {
            return false;
        }
    }

    let next_is_empty = doc
        .blocks_of(parent)
        .and_then(|blocks| blocks.get(index + 1))
        .is_some_and(Block::is_empty_recursive);
    if !next_is_empty {
        return false;
    }

    let Some(item) = doc.block_at_mut(&item_path).and_then(Block::as_list_item_mut) else {
        return false;
    };
    item.toggle_off();
    tracing::trace!(target: "vellum::collapse", path = ?item_path, "demoted list item");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_model::{
        ListItem, ListLevel, ListStyleType, ListType, NumberingListType, Paragraph, Segment,
    };

    fn numbered_item(text: &str) -> Block {
        Block::ListItem(ListItem::new(
            ListLevel::with_style(
                ListType::Ordered,
                ListStyleType::Numbering(NumberingListType::Decimal),
            ),
            Paragraph::from_text(text),
        ))
    }

    fn empty_item() -> Block {
        let mut paragraph = Paragraph::new();
        paragraph.segments.push(Segment::LineBreak);
        Block::ListItem(ListItem::new(
            ListLevel::with_style(
                ListType::Ordered,
                ListStyleType::Numbering(NumberingListType::Decimal),
            ),
            paragraph,
        ))
    }

    fn levels_of(doc: &ContentModelDocument, path: &[usize]) -> usize {
        doc.block_at(path)
            .and_then(Block::as_list_item)
            .map(|item| item.levels.len())
            .unwrap_or(usize::MAX)
    }

    /// Selection ran from inside the first item through the following
    /// empty item; the first item collapses.
    #[test]
    fn test_collapses_first_item_deleted_into_blank() {
        let mut doc = ContentModelDocument::from_blocks(vec![numbered_item(""), empty_item()]);
        let ctx = DeleteContext {
            insert_point: InsertPoint::at_start(vec![0, 0]),
            kind: DeleteKind::Range,
            selection_start: vec![0, 0],
            selection_end: vec![1, 0],
        };
        assert!(collapse_deleted_list_item(&mut doc, &ctx));
        assert_eq!(levels_of(&doc, &[0]), 0);
        // Only the levels change; the item is re-homed by normalize.
        assert!(doc.block_at(&[0]).unwrap().is_list_item());
    }

    /// A non-overlapped previous sibling keeps the item a list.
    #[test]
    fn test_untouched_previous_sibling_blocks_collapse() {
        let mut doc = ContentModelDocument::from_blocks(vec![
            numbered_item("kept"),
            numbered_item(""),
            empty_item(),
        ]);
        let ctx = DeleteContext {
            insert_point: InsertPoint::at_start(vec![1, 0]),
            kind: DeleteKind::Range,
            selection_start: vec![1, 0],
            selection_end: vec![2, 0],
        };
        assert!(!collapse_deleted_list_item(&mut doc, &ctx));
        assert_eq!(levels_of(&doc, &[1]), 1);
    }

    /// When the previous sibling overlapped the selection too, the
    /// collapse applies.
    #[test]
    fn test_overlapped_previous_sibling_allows_collapse() {
        let mut doc = ContentModelDocument::from_blocks(vec![
            numbered_item(""),
            numbered_item(""),
            empty_item(),
        ]);
        let ctx = DeleteContext {
            insert_point: InsertPoint::at_start(vec![1, 0]),
            kind: DeleteKind::Range,
            selection_start: vec![0, 0],
            selection_end: vec![2, 0],
        };
        assert!(collapse_deleted_list_item(&mut doc, &ctx));
        assert_eq!(levels_of(&doc, &[1]), 0);
    }

    #[test]
    fn test_caret_delete_never_collapses() {
        let mut doc = ContentModelDocument::from_blocks(vec![numbered_item(""), empty_item()]);
        let ctx = DeleteContext {
            insert_point: InsertPoint::at_start(vec![0, 0]),
            kind: DeleteKind::Caret,
            selection_start: vec![0, 0],
            selection_end: vec![1, 0],
        };
        assert!(!collapse_deleted_list_item(&mut doc, &ctx));
    }

    #[test]
    fn test_non_empty_next_sibling_blocks_collapse() {
        let mut doc =
            ContentModelDocument::from_blocks(vec![numbered_item(""), numbered_item("text")]);
        let ctx = DeleteContext {
            insert_point: InsertPoint::at_start(vec![0, 0]),
            kind: DeleteKind::Range,
            selection_start: vec![0, 0],
            selection_end: vec![1, 0],
        };
        assert!(!collapse_deleted_list_item(&mut doc, &ctx));
    }

    #[test]
    fn test_no_list_item_on_path_is_noop() {
        let mut doc = ContentModelDocument::from_blocks(vec![Block::Paragraph(
            Paragraph::from_text("plain"),
        )]);
        let ctx = DeleteContext {
            insert_point: InsertPoint::at_start(vec![0]),
            kind: DeleteKind::Range,
            selection_start: vec![0],
            selection_end: vec![0],
        };
        assert!(!collapse_deleted_list_item(&mut doc, &ctx));
    }
}
