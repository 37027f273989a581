//! List-specific model types: levels and items.
//!
//! A `ListItem` is a block group carrying a stack of `ListLevel`s
//! (outermost first) plus its content blocks. The level stack is replaced
//! wholesale on format changes and cleared when an item is demoted to
//! plain content.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::block::{Block, Paragraph};
use crate::style::ListStyleType;

/// Ordered vs unordered list kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Ordered,
    Unordered,
}

/// Per-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLevelFormat {
    /// Resolved rendering style, if one has been chosen.
    pub list_style_type: Option<ListStyleType>,
    /// Forces the first rendered number of the sequence this level starts.
    pub start_number_override: Option<u32>,
}

/// One nesting depth of a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLevel {
    pub list_type: ListType,
    pub format: ListLevelFormat,
    /// Opaque persisted per-level metadata (see `metadata`).
    pub dataset: BTreeMap<SmolStr, SmolStr>,
}

impl ListLevel {
    pub fn new(list_type: ListType) -> Self {
        Self {
            list_type,
            format: ListLevelFormat::default(),
            dataset: BTreeMap::new(),
        }
    }

    pub fn with_style(list_type: ListType, style: ListStyleType) -> Self {
        Self {
            list_type,
            format: ListLevelFormat {
                list_style_type: Some(style),
                start_number_override: None,
            },
            dataset: BTreeMap::new(),
        }
    }
}

/// A list item block group: level stack plus content.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// Outermost level first, current nesting depth last. Empty means the
    /// item has been demoted and awaits normalization.
    pub levels: Vec<ListLevel>,
    pub blocks: Vec<Block>,
}

impl ListItem {
    pub fn new(level: ListLevel, paragraph: Paragraph) -> Self {
        Self {
            levels: vec![level],
            blocks: vec![Block::Paragraph(paragraph)],
        }
    }

    /// Kind of the outermost level, i.e. what the item renders as at the
    /// top of its nesting.
    pub fn list_type(&self) -> Option<ListType> {
        self.levels.first().map(|level| level.list_type)
    }

    /// Style of the current (innermost) nesting depth.
    pub fn style_type(&self) -> Option<ListStyleType> {
        self.levels.last()?.format.list_style_type
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Increase nesting by one level, inheriting the current kind and
    /// style. The new level never inherits a start override.
    pub fn indent(&mut self) {
        let Some(last) = self.levels.last() else {
            return;
        };
        let mut level = ListLevel::new(last.list_type);
        level.format.list_style_type = last.format.list_style_type;
        self.levels.push(level);
    }

    /// Decrease nesting by one level. Returns false when already at the
    /// outermost depth; use `toggle_off` for that transition.
    pub fn outdent(&mut self) -> bool {
        if self.levels.len() > 1 {
            self.levels.pop();
            true
        } else {
            false
        }
    }

    /// Demote the item to plain content. The empty level stack is the
    /// signal a later normalization pass re-homes the item on.
    pub fn toggle_off(&mut self) {
        self.levels.clear();
    }

    pub fn first_paragraph(&self) -> Option<&Paragraph> {
        self.blocks.iter().find_map(Block::as_paragraph)
    }

    pub fn first_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.blocks.iter_mut().find_map(Block::as_paragraph_mut)
    }

    pub fn last_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.blocks
            .iter_mut()
            .rev()
            .find_map(Block::as_paragraph_mut)
    }

    /// True when every content block is recursively empty.
    pub fn is_empty_content(&self) -> bool {
        self.blocks.iter().all(Block::is_empty_recursive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BulletListType, NumberingListType};

    fn make_item(text: &str) -> ListItem {
        ListItem::new(
            ListLevel::with_style(
                ListType::Ordered,
                ListStyleType::Numbering(NumberingListType::Decimal),
            ),
            Paragraph::from_text(text),
        )
    }

    #[test]
    fn test_indent_inherits_kind_and_style() {
        let mut item = make_item("one");
        item.indent();
        assert_eq!(item.depth(), 2);
        let inner = item.levels.last().unwrap();
        assert_eq!(inner.list_type, ListType::Ordered);
        assert_eq!(
            inner.format.list_style_type,
            Some(ListStyleType::Numbering(NumberingListType::Decimal))
        );
        assert_eq!(inner.format.start_number_override, None);
    }

    #[test]
    fn test_outdent_stops_at_outermost() {
        let mut item = make_item("one");
        item.indent();
        assert!(item.outdent());
        assert!(!item.outdent());
        assert_eq!(item.depth(), 1);
    }

    #[test]
    fn test_toggle_off_clears_levels() {
        let mut item = make_item("one");
        item.toggle_off();
        assert!(item.levels.is_empty());
        assert_eq!(item.list_type(), None);
    }

    #[test]
    fn test_empty_content() {
        let empty = ListItem::new(
            ListLevel::with_style(
                ListType::Unordered,
                ListStyleType::Bullet(BulletListType::Disc),
            ),
            Paragraph::new(),
        );
        assert!(empty.is_empty_content());
        assert!(!make_item("text").is_empty_content());
    }
}
