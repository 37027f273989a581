//! Auto-bullet triggers and the marker-to-list conversion.
//!
//! Two trigger layers coexist: the legacy recognizer (a fixed
//! bullet/number pattern over the last four characters) and the
//! experimental one driven by full style inference over a five character
//! window. They differ on purpose and stay separately configurable; see
//! `infer` for the experimental side.

use vellum_model::{
    Block, BlockPath, InsertPoint, ListItem, ListLevel, ListMetadata, ListStyleType,
    write_list_metadata,
};

use crate::editor::Editor;
use crate::undo::ChangeSource;

/// Longest marker text the legacy recognizer looks at.
pub const LEGACY_MARKER_WINDOW: usize = 4;

/// Outcome of the legacy recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyTrigger {
    /// `*` or `-`: a plain bullet list.
    Bullet,
    /// A numeric marker; the parsed value seeds the start number.
    Numbering { start: u32 },
}

/// The legacy recognizer: `*` and `-` make bullets; 1-2 digits (bare or
/// parenthesized) followed by `.` `>` `)` or `-` make a numbered list.
pub fn legacy_trigger(marker: &str) -> Option<LegacyTrigger> {
    if marker.is_empty() || marker.chars().count() > LEGACY_MARKER_WINDOW {
        return None;
    }
    if marker == "*" || marker == "-" {
        return Some(LegacyTrigger::Bullet);
    }
    let (parenthesized, rest) = match marker.strip_prefix('(') {
        Some(rest) => (true, rest),
        None => (false, marker),
    };
    let digit_count = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_count == 0 || digit_count > 2 {
        return None;
    }
    let (digits, after) = rest.split_at(digit_count);
    let mut after_chars = after.chars();
    let separator = after_chars.next()?;
    if after_chars.next().is_some() {
        return None;
    }
    if parenthesized {
        if separator != ')' {
            return None;
        }
    } else if !matches!(separator, '.' | '>' | ')' | '-') {
        return None;
    }
    let start: u32 = digits.parse().ok()?;
    if start == 0 {
        return None;
    }
    Some(LegacyTrigger::Numbering { start })
}

/// Replace the typed marker with a list item carrying the given style.
///
/// Runs inside an undo snapshot: deletes the marker text, rewraps the
/// caret's paragraph as a list item, persists the resolved style into the
/// level's dataset, and moves the caret to the start of the new item's
/// content.
pub(crate) fn convert_marker_to_list<E: Editor>(
    editor: &mut E,
    marker_chars: usize,
    style: ListStyleType,
    start_number: Option<u32>,
) {
    editor.add_undo_snapshot(ChangeSource::AutoBullet, false, move |ed| {
        let point = ed.insert_point();
        let Some((&index, parent)) = point.path.split_last() else {
            return;
        };
        let parent: BlockPath = parent.to_vec();

        {
            let Some(paragraph) = ed.document_mut().paragraph_at_mut(&point.path) else {
                return;
            };
            paragraph.delete_text_range(point.offset.saturating_sub(marker_chars), point.offset);
        }

        {
            let Some(blocks) = ed.document_mut().blocks_of_mut(&parent) else {
                return;
            };
            if index >= blocks.len() {
                return;
            }
            let paragraph = match blocks.remove(index) {
                Block::Paragraph(paragraph) => paragraph,
                other => {
                    blocks.insert(index, other);
                    return;
                }
            };
            let mut level = ListLevel::with_style(style.list_type(), style);
            level.format.start_number_override = start_number;
            write_list_metadata(&mut level.dataset, &ListMetadata::from_style(style));
            blocks.insert(index, Block::ListItem(ListItem::new(level, paragraph)));
        }

        let mut inner = point.path.clone();
        inner.push(0);
        ed.set_insert_point(InsertPoint::at_start(inner));
        ed.set_selection(None);
        tracing::debug!(target: "vellum::dispatch", ?style, "converted marker to list");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_bullets() {
        assert_eq!(legacy_trigger("*"), Some(LegacyTrigger::Bullet));
        assert_eq!(legacy_trigger("-"), Some(LegacyTrigger::Bullet));
        // The richer bullet lexicon belongs to the experimental path.
        assert_eq!(legacy_trigger("->"), None);
        assert_eq!(legacy_trigger("\u{2014}"), None);
    }

    #[test]
    fn test_legacy_numbering() {
        assert_eq!(
            legacy_trigger("1."),
            Some(LegacyTrigger::Numbering { start: 1 })
        );
        assert_eq!(
            legacy_trigger("12>"),
            Some(LegacyTrigger::Numbering { start: 12 })
        );
        assert_eq!(
            legacy_trigger("(7)"),
            Some(LegacyTrigger::Numbering { start: 7 })
        );
        assert_eq!(
            legacy_trigger("3-"),
            Some(LegacyTrigger::Numbering { start: 3 })
        );
    }

    #[test]
    fn test_legacy_rejects() {
        assert_eq!(legacy_trigger(""), None);
        assert_eq!(legacy_trigger("1"), None);
        assert_eq!(legacy_trigger("a."), None);
        assert_eq!(legacy_trigger("123."), None);
        assert_eq!(legacy_trigger("(1."), None);
        assert_eq!(legacy_trigger("0."), None);
        // Four characters is the cap.
        assert_eq!(legacy_trigger("(12)"), Some(LegacyTrigger::Numbering { start: 12 }));
        assert_eq!(legacy_trigger("(12))"), None);
    }
}
