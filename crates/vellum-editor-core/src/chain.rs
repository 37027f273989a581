//! List chains: linking separated list segments so numbering continues
//! across interruptions.
//!
//! A *segment* is a maximal run of adjacent sibling list items sharing a
//! list kind. Ordered segments in one region link into a *chain*: a quote
//! or plain paragraph between two numbered segments does not end the
//! sequence, an unordered (or differently based) list does. Chains are
//! computed against the pre-mutation region and committed afterwards,
//! when the post-mutation item counts are observable.

use vellum_model::{Block, ListStyleType, ListType, NumberingBase};

/// What makes two list segments numbering-compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListKey {
    pub kind: ListType,
    /// Counting scheme for ordered segments; `None` for unordered.
    pub family: Option<NumberingBase>,
}

/// The sibling-sequence seam the chain algorithms are written against.
/// Implemented for the model's block sequences; anything that can answer
/// these three questions can be renumbered.
pub trait ListRegion {
    fn block_count(&self) -> usize;

    /// The key of the list item at `index`, or `None` for non-list blocks
    /// (and demoted items without levels).
    fn list_key_at(&self, index: usize) -> Option<ListKey>;

    /// Write a start-number override onto the first level of the item at
    /// `index`.
    fn set_start_number(&mut self, index: usize, value: u32);
}

impl ListRegion for [Block] {
    fn block_count(&self) -> usize {
        self.len()
    }

    fn list_key_at(&self, index: usize) -> Option<ListKey> {
        let item = self.get(index)?.as_list_item()?;
        let kind = item.list_type()?;
        let family = match kind {
            ListType::Ordered => {
                let style = item.levels.first().and_then(|level| level.format.list_style_type);
                Some(match style {
                    Some(ListStyleType::Numbering(numbering)) => numbering.base(),
                    _ => NumberingBase::Decimal,
                })
            }
            ListType::Unordered => None,
        };
        Some(ListKey { kind, family })
    }

    fn set_start_number(&mut self, index: usize, value: u32) {
        let Some(item) = self.get_mut(index).and_then(Block::as_list_item_mut) else {
            return;
        };
        if let Some(level) = item.levels.first_mut() {
            level.format.start_number_override = Some(value);
        }
    }
}

/// A maximal run of adjacent list items with one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSegment {
    /// Index of the segment's first block within its region.
    pub start: usize,
    pub item_count: usize,
    pub key: ListKey,
}

/// Scan a region's direct blocks into list segments.
pub fn scan_segments<R: ListRegion + ?Sized>(region: &R) -> Vec<ListSegment> {
    let mut segments = Vec::new();
    let mut open: Option<ListSegment> = None;
    for index in 0..region.block_count() {
        match region.list_key_at(index) {
            Some(key) => match &mut open {
                Some(segment) if segment.key == key => segment.item_count += 1,
                _ => {
                    if let Some(done) = open.take() {
                        segments.push(done);
                    }
                    open = Some(ListSegment {
                        start: index,
                        item_count: 1,
                        key,
                    });
                }
            },
            None => {
                if let Some(done) = open.take() {
                    segments.push(done);
                }
            }
        }
    }
    if let Some(done) = open.take() {
        segments.push(done);
    }
    segments
}

/// One chain member: a segment as it looked at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainMember {
    /// Ordinal of the segment among the region's segments at scan time.
    pub segment_index: usize,
    pub start: usize,
    pub item_count: usize,
    pub key: ListKey,
}

/// A run of ordered segments whose numbering is treated as continuous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChain {
    pub members: Vec<ChainMember>,
}

/// Build the chains of a region. Unordered segments never join a chain;
/// they end whichever chain was open, as does an ordered segment of a
/// different counting family.
pub fn compute_chains<R: ListRegion + ?Sized>(region: &R) -> Vec<ListChain> {
    let segments = scan_segments(region);
    let mut chains: Vec<ListChain> = Vec::new();
    let mut open: Option<ListChain> = None;
    for (ordinal, segment) in segments.iter().enumerate() {
        if segment.kind() != ListType::Ordered {
            if let Some(done) = open.take() {
                chains.push(done);
            }
            continue;
        }
        let member = ChainMember {
            segment_index: ordinal,
            start: segment.start,
            item_count: segment.item_count,
            key: segment.key,
        };
        match &mut open {
            Some(chain) if chain.members.last().map(|m| m.key) == Some(segment.key) => {
                chain.members.push(member);
            }
            _ => {
                if let Some(done) = open.take() {
                    chains.push(done);
                }
                open = Some(ListChain {
                    members: vec![member],
                });
            }
        }
    }
    if let Some(done) = open.take() {
        chains.push(done);
    }
    chains
}

impl ListSegment {
    fn kind(&self) -> ListType {
        self.key.kind
    }
}

/// Renumber every chain against the region's current state. Non-initial
/// members get a start override of `1 + sum(current item counts of the
/// earlier members)`, written to the first level of their first item.
/// Re-running with an unchanged region writes identical values.
///
/// A member whose segment no longer matches its recorded key (the list
/// was retyped or removed since the scan) is skipped; the rest of the
/// chain still commits.
pub fn commit_chains<R: ListRegion + ?Sized>(region: &mut R, chains: &[ListChain]) {
    let current = scan_segments(region);
    for chain in chains {
        if chain.members.len() < 2 {
            continue;
        }
        let mut running = 0usize;
        for (position, member) in chain.members.iter().enumerate() {
            match current.get(member.segment_index) {
                Some(segment) if segment.key == member.key => {
                    if position > 0 {
                        region.set_start_number(segment.start, (1 + running) as u32);
                        tracing::trace!(
                            target: "vellum::chain",
                            start = segment.start,
                            value = 1 + running,
                            "renumbered chain member"
                        );
                    }
                    running += segment.item_count;
                }
                _ => {
                    tracing::debug!(
                        target: "vellum::chain",
                        segment = member.segment_index,
                        "chain member no longer matches; skipping"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_model::{
        Block, BulletListType, ListItem, ListLevel, NumberingListType, Paragraph,
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

    fn bullet_item(text: &str) -> Block {
        Block::ListItem(ListItem::new(
            ListLevel::with_style(
                ListType::Unordered,
                ListStyleType::Bullet(BulletListType::Disc),
            ),
            Paragraph::from_text(text),
        ))
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph(Paragraph::from_text(text))
    }

    /// Three numbered segments with item counts 2, 3, 1, separated by
    /// plain paragraphs.
    fn chained_region() -> Vec<Block> {
        vec![
            numbered_item("a1"),
            numbered_item("a2"),
            paragraph("interruption"),
            numbered_item("b1"),
            numbered_item("b2"),
            numbered_item("b3"),
            paragraph("interruption"),
            numbered_item("c1"),
        ]
    }

    fn start_override(blocks: &[Block], index: usize) -> Option<u32> {
        blocks[index]
            .as_list_item()
            .and_then(|item| item.levels.first())
            .and_then(|level| level.format.start_number_override)
    }

    #[test]
    fn test_scan_segments() {
        let blocks = chained_region();
        let segments = scan_segments(blocks.as_slice());
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments.iter().map(|s| s.item_count).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );
        assert_eq!(segments[1].start, 3);
    }

    #[test]
    fn test_commit_renumbers_later_members() {
        let mut blocks = chained_region();
        let chains = compute_chains(blocks.as_slice());
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].members.len(), 3);

        commit_chains(blocks.as_mut_slice(), &chains);
        assert_eq!(start_override(&blocks, 0), None);
        assert_eq!(start_override(&blocks, 3), Some(3));
        assert_eq!(start_override(&blocks, 7), Some(6));
        // Only the first item of each member is touched.
        assert_eq!(start_override(&blocks, 4), None);
    }

    #[test]
    fn test_commit_is_idempotent() {
        let mut blocks = chained_region();
        let chains = compute_chains(blocks.as_slice());
        commit_chains(blocks.as_mut_slice(), &chains);
        let after_first = blocks.clone();
        commit_chains(blocks.as_mut_slice(), &chains);
        assert_eq!(blocks, after_first);
    }

    #[test]
    fn test_commit_reads_post_mutation_counts() {
        let mut blocks = chained_region();
        let chains = compute_chains(blocks.as_slice());
        // An item is appended to the first segment after the scan.
        blocks.insert(2, numbered_item("a3"));
        commit_chains(blocks.as_mut_slice(), &chains);
        assert_eq!(start_override(&blocks, 4), Some(4));
    }

    #[test]
    fn test_unordered_segment_breaks_chain() {
        let blocks = vec![
            numbered_item("a1"),
            bullet_item("x"),
            numbered_item("b1"),
        ];
        let chains = compute_chains(blocks.as_slice());
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].members.len(), 1);
        assert_eq!(chains[1].members.len(), 1);
    }

    /// The motivating case: a quote splitting a numbered list into two
    /// segments that renumber as one sequence.
    #[test]
    fn test_quote_block_does_not_break_chain() {
        use vellum_model::FormatContainer;

        let mut blocks = vec![
            numbered_item("a1"),
            numbered_item("a2"),
            Block::Container(FormatContainer::new(
                "blockquote",
                vec![Block::Paragraph(Paragraph::from_text("aside"))],
            )),
            numbered_item("b1"),
        ];
        let chains = compute_chains(blocks.as_slice());
        assert_eq!(chains.len(), 1);
        commit_chains(blocks.as_mut_slice(), &chains);
        assert_eq!(start_override(&blocks, 3), Some(3));
    }

    #[test]
    fn test_single_member_chain_is_noop() {
        let mut blocks = vec![numbered_item("a1"), numbered_item("a2")];
        let chains = compute_chains(blocks.as_slice());
        commit_chains(blocks.as_mut_slice(), &chains);
        assert_eq!(start_override(&blocks, 0), None);
        assert_eq!(start_override(&blocks, 1), None);
    }

    #[test]
    fn test_retyped_member_is_skipped() {
        let mut blocks = chained_region();
        let chains = compute_chains(blocks.as_slice());
        // The middle segment turns into bullets between scan and commit.
        blocks[3] = bullet_item("b1");
        blocks[4] = bullet_item("b2");
        blocks[5] = bullet_item("b3");
        commit_chains(blocks.as_mut_slice(), &chains);
        assert_eq!(start_override(&blocks, 3), None);
        // The last member still commits, counting only matching members.
        assert_eq!(start_override(&blocks, 7), Some(3));
    }

    #[test]
    fn test_different_family_starts_new_chain() {
        let roman = Block::ListItem(ListItem::new(
            ListLevel::with_style(
                ListType::Ordered,
                ListStyleType::Numbering(NumberingListType::LowerRoman),
            ),
            Paragraph::from_text("i"),
        ));
        let blocks = vec![numbered_item("a1"), paragraph("x"), roman];
        let chains = compute_chains(blocks.as_slice());
        assert_eq!(chains.len(), 2);
    }
}
