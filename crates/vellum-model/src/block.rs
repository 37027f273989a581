//! The block tree: segments, paragraphs, block groups, and the document.
//!
//! Blocks are addressed by `BlockPath` (child indices from the document
//! root), which is also how insert points and selections refer into the
//! tree. Offsets within a paragraph count text characters; selection
//! markers and inline entities are zero-width.

use smol_str::SmolStr;

use crate::list::ListItem;

/// Child-index path from the document root to a block.
pub type BlockPath = Vec<usize>;

/// A resolved caret location: the paragraph holding the caret plus a
/// character offset into it. Never persisted; recomputed per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPoint {
    pub path: BlockPath,
    pub offset: usize,
}

impl InsertPoint {
    pub fn new(path: BlockPath, offset: usize) -> Self {
        Self { path, offset }
    }

    pub fn at_start(path: BlockPath) -> Self {
        Self { path, offset: 0 }
    }
}

/// Smallest path strictly greater than every path in `path`'s subtree.
pub fn path_successor(path: &[usize]) -> BlockPath {
    let mut successor = path.to_vec();
    if let Some(last) = successor.last_mut() {
        *last += 1;
    }
    successor
}

/// Whether the subtree rooted at `path` intersects the block range
/// spanned by `start..=end` (paths compare lexicographically).
pub fn path_in_range(path: &[usize], start: &[usize], end: &[usize]) -> bool {
    path <= end && start < path_successor(path).as_slice()
}

/// One inline piece of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(SmolStr),
    LineBreak,
    /// Zero-width placeholder standing in for the caret during structural
    /// rewrites.
    SelectionMarker,
    /// Opaque non-text inline element (image, mention, ...).
    Entity(SmolStr),
}

impl Segment {
    /// Contribution to paragraph character offsets.
    pub fn char_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::LineBreak => 1,
            Self::SelectionMarker | Self::Entity(_) => 0,
        }
    }
}

/// A leaf content block: a sequence of inline segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub segments: Vec<Segment>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut paragraph = Self::new();
        if !text.is_empty() {
            paragraph.segments.push(Segment::Text(SmolStr::new(text)));
        }
        paragraph
    }

    /// Concatenated text content; line breaks render as `\n`, zero-width
    /// segments contribute nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::LineBreak => out.push('\n'),
                Segment::SelectionMarker | Segment::Entity(_) => {}
            }
        }
        out
    }

    pub fn char_len(&self) -> usize {
        self.segments.iter().map(Segment::char_len).sum()
    }

    pub fn text_before(&self, offset: usize) -> String {
        self.text().chars().take(offset).collect()
    }

    /// Empty in the structural sense: nothing but line breaks and
    /// selection markers. Text and entities both count as content.
    pub fn is_empty_content(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::LineBreak | Segment::SelectionMarker))
    }

    /// Whether a non-text inline element sits before `offset`.
    pub fn has_entity_before(&self, offset: usize) -> bool {
        let mut pos = 0usize;
        for segment in &self.segments {
            if pos >= offset {
                break;
            }
            if matches!(segment, Segment::Entity(_)) {
                return true;
            }
            pos += segment.char_len();
        }
        false
    }

    /// Remove the character range `start..end`. Text segments are split
    /// or dropped as needed; zero-width segments in the range survive.
    pub fn delete_text_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let mut pos = 0usize;
        let mut kept: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            let len = segment.char_len();
            let seg_start = pos;
            let seg_end = pos + len;
            pos = seg_end;
            if len == 0 || seg_end <= start || seg_start >= end {
                kept.push(segment);
                continue;
            }
            match segment {
                Segment::Text(text) => {
                    let remaining: String = text
                        .chars()
                        .enumerate()
                        .filter(|(i, _)| {
                            let p = seg_start + i;
                            p < start || p >= end
                        })
                        .map(|(_, ch)| ch)
                        .collect();
                    if !remaining.is_empty() {
                        kept.push(Segment::Text(SmolStr::new(remaining)));
                    }
                }
                Segment::LineBreak => {}
                other => kept.push(other),
            }
        }
        self.segments = kept;
    }

    pub fn append_segments(&mut self, segments: Vec<Segment>) {
        self.segments.extend(segments);
    }

    /// Insert a selection marker at a character offset, splitting a text
    /// segment when the offset falls inside one.
    pub fn insert_marker(&mut self, offset: usize) {
        let mut pos = 0usize;
        let mut idx = 0usize;
        while idx < self.segments.len() {
            if offset <= pos {
                break;
            }
            let len = self.segments[idx].char_len();
            if offset < pos + len {
                if let Segment::Text(text) = &self.segments[idx] {
                    let split_at = offset - pos;
                    let head: String = text.chars().take(split_at).collect();
                    let tail: String = text.chars().skip(split_at).collect();
                    self.segments.splice(
                        idx..=idx,
                        [
                            Segment::Text(SmolStr::new(head)),
                            Segment::SelectionMarker,
                            Segment::Text(SmolStr::new(tail)),
                        ],
                    );
                    return;
                }
                break;
            }
            pos += len;
            idx += 1;
        }
        self.segments.insert(idx, Segment::SelectionMarker);
    }

    /// Remove the first selection marker, returning the character offset
    /// it sat at.
    pub fn take_marker(&mut self) -> Option<usize> {
        let mut pos = 0usize;
        for idx in 0..self.segments.len() {
            match &self.segments[idx] {
                Segment::SelectionMarker => {
                    self.segments.remove(idx);
                    return Some(pos);
                }
                segment => pos += segment.char_len(),
            }
        }
        None
    }
}

/// A generic block group wrapping child blocks under a named tag
/// (quote, aside, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct FormatContainer {
    pub tag: SmolStr,
    pub blocks: Vec<Block>,
}

impl FormatContainer {
    pub fn new(tag: &str, blocks: Vec<Block>) -> Self {
        Self {
            tag: SmolStr::new(tag),
            blocks,
        }
    }
}

/// A block in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    ListItem(ListItem),
    Container(FormatContainer),
}

impl Block {
    pub fn is_list_item(&self) -> bool {
        matches!(self, Self::ListItem(_))
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Self::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn as_list_item(&self) -> Option<&ListItem> {
        match self {
            Self::ListItem(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_list_item_mut(&mut self) -> Option<&mut ListItem> {
        match self {
            Self::ListItem(item) => Some(item),
            _ => None,
        }
    }

    /// Child blocks, for group blocks.
    pub fn child_blocks(&self) -> Option<&Vec<Block>> {
        match self {
            Self::Paragraph(_) => None,
            Self::ListItem(item) => Some(&item.blocks),
            Self::Container(container) => Some(&container.blocks),
        }
    }

    pub fn child_blocks_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Self::Paragraph(_) => None,
            Self::ListItem(item) => Some(&mut item.blocks),
            Self::Container(container) => Some(&mut container.blocks),
        }
    }

    /// A paragraph is empty per `Paragraph::is_empty_content`; a group is
    /// empty when every child is, recursively.
    pub fn is_empty_recursive(&self) -> bool {
        match self {
            Self::Paragraph(paragraph) => paragraph.is_empty_content(),
            Self::ListItem(item) => item.blocks.iter().all(Block::is_empty_recursive),
            Self::Container(container) => {
                container.blocks.iter().all(Block::is_empty_recursive)
            }
        }
    }
}

/// The structured document: a sequence of top-level blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentModelDocument {
    pub blocks: Vec<Block>,
}

impl ContentModelDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn block_at(&self, path: &[usize]) -> Option<&Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.blocks.get(*first)?;
        for &idx in rest {
            block = block.child_blocks()?.get(idx)?;
        }
        Some(block)
    }

    pub fn block_at_mut(&mut self, path: &[usize]) -> Option<&mut Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.blocks.get_mut(*first)?;
        for &idx in rest {
            block = block.child_blocks_mut()?.get_mut(idx)?;
        }
        Some(block)
    }

    /// The child sequence a path addresses into: the root sequence for an
    /// empty path, otherwise the children of the group at `path`.
    pub fn blocks_of(&self, path: &[usize]) -> Option<&Vec<Block>> {
        if path.is_empty() {
            Some(&self.blocks)
        } else {
            self.block_at(path)?.child_blocks()
        }
    }

    pub fn blocks_of_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Block>> {
        if path.is_empty() {
            Some(&mut self.blocks)
        } else {
            self.block_at_mut(path)?.child_blocks_mut()
        }
    }

    pub fn paragraph_at(&self, path: &[usize]) -> Option<&Paragraph> {
        self.block_at(path)?.as_paragraph()
    }

    pub fn paragraph_at_mut(&mut self, path: &[usize]) -> Option<&mut Paragraph> {
        self.block_at_mut(path)?.as_paragraph_mut()
    }

    /// Longest prefix of `path` (the path itself included) addressing a
    /// list item.
    pub fn list_item_ancestor(&self, path: &[usize]) -> Option<BlockPath> {
        for n in (1..=path.len()).rev() {
            let prefix = &path[..n];
            if matches!(self.block_at(prefix), Some(Block::ListItem(_))) {
                return Some(prefix.to_vec());
            }
        }
        None
    }

    /// Paths of every list item in the document, in document order.
    pub fn list_item_paths(&self) -> Vec<BlockPath> {
        fn walk(blocks: &[Block], prefix: &BlockPath, out: &mut Vec<BlockPath>) {
            for (idx, block) in blocks.iter().enumerate() {
                let mut path = prefix.clone();
                path.push(idx);
                if block.is_list_item() {
                    out.push(path.clone());
                }
                if let Some(children) = block.child_blocks() {
                    walk(children, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.blocks, &Vec::new(), &mut out);
        out
    }

    /// Re-home demoted list items: an item whose level stack is empty is
    /// replaced by its child blocks, spliced in place.
    pub fn normalize(&mut self) {
        normalize_blocks(&mut self.blocks);
    }
}

fn normalize_blocks(blocks: &mut Vec<Block>) {
    let mut idx = 0;
    while idx < blocks.len() {
        let demoted = match &mut blocks[idx] {
            Block::Paragraph(_) => false,
            Block::ListItem(item) => {
                normalize_blocks(&mut item.blocks);
                item.levels.is_empty()
            }
            Block::Container(container) => {
                normalize_blocks(&mut container.blocks);
                false
            }
        };
        if !demoted {
            idx += 1;
            continue;
        }
        match blocks.remove(idx) {
            Block::ListItem(item) => {
                let children = item.blocks;
                let count = children.len();
                blocks.splice(idx..idx, children);
                idx += count;
            }
            other => {
                blocks.insert(idx, other);
                idx += 1;
            }
        }
    }
}

/// Force where the list sequence containing `point` starts numbering.
/// Applies to the first level of the nearest enclosing list item.
pub fn set_list_start_number(
    doc: &mut ContentModelDocument,
    point: &InsertPoint,
    value: u32,
) -> bool {
    let Some(item_path) = doc.list_item_ancestor(&point.path) else {
        return false;
    };
    let Some(Block::ListItem(item)) = doc.block_at_mut(&item_path) else {
        return false;
    };
    let Some(level) = item.levels.first_mut() else {
        return false;
    };
    level.format.start_number_override = Some(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{ListLevel, ListType};

    fn make_item(text: &str) -> ListItem {
        ListItem::new(ListLevel::new(ListType::Ordered), Paragraph::from_text(text))
    }

    #[test]
    fn test_paragraph_text_and_offsets() {
        let mut paragraph = Paragraph::from_text("hello");
        paragraph.segments.push(Segment::LineBreak);
        paragraph.segments.push(Segment::Text(SmolStr::new("world")));
        assert_eq!(paragraph.text(), "hello\nworld");
        assert_eq!(paragraph.char_len(), 11);
        assert_eq!(paragraph.text_before(7), "hello\nw");
    }

    #[test]
    fn test_empty_content() {
        let mut paragraph = Paragraph::new();
        assert!(paragraph.is_empty_content());
        paragraph.segments.push(Segment::LineBreak);
        paragraph.segments.push(Segment::SelectionMarker);
        assert!(paragraph.is_empty_content());
        paragraph.segments.push(Segment::Entity(SmolStr::new("img")));
        assert!(!paragraph.is_empty_content());
    }

    #[test]
    fn test_delete_text_range_splits_segments() {
        let mut paragraph = Paragraph::from_text("1. hello");
        paragraph.delete_text_range(0, 3);
        assert_eq!(paragraph.text(), "hello");

        let mut paragraph = Paragraph::from_text("abcdef");
        paragraph.delete_text_range(2, 4);
        assert_eq!(paragraph.text(), "abef");
    }

    #[test]
    fn test_delete_text_range_keeps_zero_width() {
        let mut paragraph = Paragraph::from_text("ab");
        paragraph.segments.insert(1, Segment::SelectionMarker);
        paragraph.delete_text_range(0, 2);
        assert_eq!(paragraph.segments, vec![Segment::SelectionMarker]);
    }

    #[test]
    fn test_marker_round_trip() {
        let mut paragraph = Paragraph::from_text("abcd");
        paragraph.insert_marker(2);
        assert_eq!(paragraph.text(), "abcd");
        assert_eq!(paragraph.take_marker(), Some(2));
        assert_eq!(paragraph.take_marker(), None);
    }

    #[test]
    fn test_marker_at_segment_boundaries() {
        let mut paragraph = Paragraph::from_text("ab");
        paragraph.insert_marker(0);
        assert_eq!(paragraph.take_marker(), Some(0));
        paragraph.insert_marker(2);
        assert_eq!(paragraph.take_marker(), Some(2));
    }

    #[test]
    fn test_has_entity_before() {
        let mut paragraph = Paragraph::new();
        paragraph.segments.push(Segment::Entity(SmolStr::new("img")));
        paragraph.segments.push(Segment::Text(SmolStr::new("1.")));
        assert!(paragraph.has_entity_before(2));
        assert!(!Paragraph::from_text("1.").has_entity_before(2));
    }

    #[test]
    fn test_block_navigation() {
        let doc = ContentModelDocument::from_blocks(vec![
            Block::Paragraph(Paragraph::from_text("intro")),
            Block::ListItem(make_item("one")),
        ]);
        assert!(doc.paragraph_at(&[0]).is_some());
        assert!(doc.block_at(&[1]).unwrap().is_list_item());
        assert!(doc.paragraph_at(&[1, 0]).is_some());
        assert!(doc.block_at(&[2]).is_none());
    }

    #[test]
    fn test_list_item_ancestor() {
        let doc = ContentModelDocument::from_blocks(vec![
            Block::Paragraph(Paragraph::from_text("intro")),
            Block::ListItem(make_item("one")),
        ]);
        assert_eq!(doc.list_item_ancestor(&[1, 0]), Some(vec![1]));
        assert_eq!(doc.list_item_ancestor(&[1]), Some(vec![1]));
        assert_eq!(doc.list_item_ancestor(&[0]), None);
    }

    #[test]
    fn test_normalize_splices_demoted_items() {
        let mut demoted = make_item("loose");
        demoted.toggle_off();
        let mut doc = ContentModelDocument::from_blocks(vec![
            Block::ListItem(make_item("one")),
            Block::ListItem(demoted),
            Block::ListItem(make_item("two")),
        ]);
        doc.normalize();
        assert_eq!(doc.blocks.len(), 3);
        assert!(doc.blocks[0].is_list_item());
        assert!(matches!(doc.blocks[1], Block::Paragraph(_)));
        assert!(doc.blocks[2].is_list_item());
        assert_eq!(doc.paragraph_at(&[1]).unwrap().text(), "loose");
    }

    #[test]
    fn test_set_list_start_number() {
        let mut doc = ContentModelDocument::from_blocks(vec![Block::ListItem(make_item("one"))]);
        assert!(set_list_start_number(
            &mut doc,
            &InsertPoint::at_start(vec![0, 0]),
            4
        ));
        let item = doc.block_at(&[0]).unwrap().as_list_item().unwrap();
        assert_eq!(item.levels[0].format.start_number_override, Some(4));

        doc.blocks.push(Block::Paragraph(Paragraph::from_text("plain")));
        assert!(!set_list_start_number(
            &mut doc,
            &InsertPoint::at_start(vec![1]),
            2
        ));
    }

    #[test]
    fn test_path_in_range() {
        // Selection from inside block 1 through inside block 3.
        let start = vec![1, 0];
        let end = vec![3, 0];
        assert!(path_in_range(&[1], &start, &end));
        assert!(path_in_range(&[2], &start, &end));
        assert!(path_in_range(&[3], &start, &end));
        assert!(!path_in_range(&[0], &start, &end));
        assert!(!path_in_range(&[4], &start, &end));
    }
}
