//! The list edit feature set and its dispatch state machine.
//!
//! Each feature is a predicate/action pair registered against trigger
//! keys in a fixed table. Per key event the dispatcher evaluates the
//! predicates of every feature registered for the pressed key, in table
//! order, and runs at most one action: the first whose predicate holds.
//! Predicates are side-effect-free with respect to the document (they may
//! fill the event's `EventContext`); actions mutate inside undo
//! snapshots and may schedule the deferred chain pass, which the
//! dispatcher drains before returning.
//!
//! Structural mismatches are never errors here: a predicate that finds
//! the wrong shape returns false and the keystroke falls through to the
//! platform's default handling.

use vellum_model::{
    Block, BlockPath, BulletListType, InsertPoint, ListStyleType, NumberingListType, Paragraph,
    path_in_range,
};

use crate::autobullet::{LegacyTrigger, convert_marker_to_list, legacy_trigger};
use crate::chain::{ListChain, commit_chains, compute_chains};
use crate::context::EventContext;
use crate::deferred::DeferredTask;
use crate::editor::{Editor, ExperimentalFlag};
use crate::keys::{Key, KeyEvent, KeydownResult, Modifiers};
use crate::undo::ChangeSource;

/// The closed set of list editing features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListFeatureKind {
    OutdentWhenBackspaceOnEmptyFirstLine,
    MergeInNewLine,
    MergeListOnBackspaceAfterList,
    OutdentWhenEnterOnEmptyLine,
    IndentWhenTab,
    OutdentWhenShiftTab,
    AutoBulletList,
    AutoNumberingList,
    AutoBullet,
    MaintainListChainWhenDelete,
    MaintainListChain,
}

/// One registered feature: trigger keys plus the predicate/action pair.
pub struct ListFeature<E: Editor> {
    pub kind: ListFeatureKind,
    pub keys: &'static [Key],
    pub should_handle_event: fn(&E, &mut EventContext, &KeyEvent) -> bool,
    pub handle_event: fn(&mut E, &mut EventContext, &mut KeyEvent),
    /// Experimental features ship disabled; their predicates also gate on
    /// `Editor::is_feature_enabled`.
    pub default_disabled: bool,
}

static BACKSPACE_KEYS: [Key; 1] = [Key::Backspace];
static DELETE_KEYS: [Key; 1] = [Key::Delete];
static ENTER_KEYS: [Key; 1] = [Key::Enter];
static TAB_KEYS: [Key; 1] = [Key::Tab];
static SPACE_KEYS: [Key; 1] = [Key::Space];
static CHAIN_KEYS: [Key; 12] = [
    Key::Enter,
    Key::Tab,
    Key::Delete,
    Key::Backspace,
    Key::ArrowLeft,
    Key::ArrowRight,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::Home,
    Key::End,
    Key::PageUp,
    Key::PageDown,
];

/// The registry, in dispatch order. Structural features come before the
/// chain maintainers so that at most one action runs per event and the
/// structural one wins.
pub fn list_features<E: Editor>() -> Vec<ListFeature<E>> {
    vec![
        ListFeature {
            kind: ListFeatureKind::OutdentWhenBackspaceOnEmptyFirstLine,
            keys: &BACKSPACE_KEYS,
            should_handle_event: should_outdent_on_empty_first_line,
            handle_event: outdent_on_empty_first_line,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::MergeInNewLine,
            keys: &BACKSPACE_KEYS,
            should_handle_event: should_merge_in_new_line,
            handle_event: merge_in_new_line,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::MergeListOnBackspaceAfterList,
            keys: &BACKSPACE_KEYS,
            should_handle_event: should_merge_lists_on_backspace,
            handle_event: merge_lists_on_backspace,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::OutdentWhenEnterOnEmptyLine,
            keys: &ENTER_KEYS,
            should_handle_event: should_outdent_on_enter_on_empty_line,
            handle_event: outdent_on_enter_on_empty_line,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::IndentWhenTab,
            keys: &TAB_KEYS,
            should_handle_event: should_indent_on_tab,
            handle_event: indent_on_tab,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::OutdentWhenShiftTab,
            keys: &TAB_KEYS,
            should_handle_event: should_outdent_on_shift_tab,
            handle_event: outdent_on_shift_tab,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::AutoBulletList,
            keys: &SPACE_KEYS,
            should_handle_event: should_auto_bullet_list,
            handle_event: auto_format_list,
            default_disabled: true,
        },
        ListFeature {
            kind: ListFeatureKind::AutoNumberingList,
            keys: &SPACE_KEYS,
            should_handle_event: should_auto_numbering_list,
            handle_event: auto_format_list,
            default_disabled: true,
        },
        ListFeature {
            kind: ListFeatureKind::AutoBullet,
            keys: &SPACE_KEYS,
            should_handle_event: should_auto_bullet,
            handle_event: auto_bullet,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::MaintainListChainWhenDelete,
            keys: &DELETE_KEYS,
            should_handle_event: should_maintain_chain_when_delete,
            handle_event: maintain_chain_when_delete,
            default_disabled: false,
        },
        ListFeature {
            kind: ListFeatureKind::MaintainListChain,
            keys: &CHAIN_KEYS,
            should_handle_event: should_maintain_chain,
            handle_event: maintain_chain,
            default_disabled: false,
        },
    ]
}

/// Dispatch one key event through the feature table, then drain the
/// deferred queue so the post-mutation chain pass runs before the next
/// event is accepted.
pub fn handle_key_event<E: Editor>(editor: &mut E, event: &mut KeyEvent) -> KeydownResult {
    let features = list_features::<E>();
    let mut context = EventContext::new();
    let mut handled = false;
    for feature in &features {
        if !feature.keys.contains(&event.key) {
            continue;
        }
        if (feature.should_handle_event)(editor, &mut context, event) {
            tracing::trace!(target: "vellum::dispatch", kind = ?feature.kind, "dispatching");
            (feature.handle_event)(editor, &mut context, event);
            handled = true;
            break;
        }
    }
    drain_deferred(editor);
    if handled {
        KeydownResult::Handled
    } else {
        KeydownResult::NotHandled
    }
}

/// Run pending deferred work. Called by the dispatcher after every event;
/// hosts that mutate the document outside the dispatcher call it at the
/// same point of their own loop.
pub fn drain_deferred<E: Editor>(editor: &mut E) {
    while let Some(task) = editor.take_deferred() {
        match task {
            DeferredTask::CommitListChains { region, chains } => {
                if let Some(blocks) = editor.document_mut().blocks_of_mut(&region) {
                    commit_chains(blocks.as_mut_slice(), &chains);
                }
            }
        }
    }
}

// === Shared helpers ===

fn parent_path(path: &[usize]) -> BlockPath {
    match path.split_last() {
        Some((_, parent)) => parent.to_vec(),
        None => Vec::new(),
    }
}

fn has_previous_list_sibling<E: Editor>(editor: &E, item_path: &[usize]) -> bool {
    let Some((&index, parent)) = item_path.split_last() else {
        return false;
    };
    index > 0
        && editor
            .document()
            .blocks_of(parent)
            .and_then(|blocks| blocks.get(index - 1))
            .is_some_and(Block::is_list_item)
}

fn region_chains<E: Editor>(editor: &E, region: &[usize]) -> Vec<ListChain> {
    editor
        .document()
        .blocks_of(region)
        .map(|blocks| compute_chains(blocks.as_slice()))
        .unwrap_or_default()
}

fn schedule_chain_commit<E: Editor>(editor: &mut E, region: BlockPath, chains: Vec<ListChain>) {
    if chains.is_empty() {
        return;
    }
    editor.schedule(DeferredTask::CommitListChains { region, chains });
}

/// List items the edit applies to: every item the selection touches, or
/// the caret's enclosing item.
fn target_items<E: Editor>(editor: &E, context: &mut EventContext) -> Vec<BlockPath> {
    if let Some(selection) = editor.selection() {
        let items: Vec<BlockPath> = editor
            .document()
            .list_item_paths()
            .into_iter()
            .filter(|path| path_in_range(path, &selection.start.path, &selection.end.path))
            .collect();
        if !items.is_empty() {
            return items;
        }
    }
    context.list_item_path(editor).into_iter().collect()
}

/// Demote an item to plain content and re-home it, keeping the caret on
/// the paragraph that replaces it.
fn toggle_item_off<E: Editor>(editor: &mut E, item_path: &[usize]) {
    let offset = editor.insert_point().offset;
    {
        let Some(item) = editor
            .document_mut()
            .block_at_mut(item_path)
            .and_then(Block::as_list_item_mut)
        else {
            return;
        };
        item.toggle_off();
    }
    editor.document_mut().normalize();
    editor.set_insert_point(InsertPoint::new(item_path.to_vec(), offset));
    editor.set_selection(None);
}

// === Outdent on Backspace in an empty first item ===

fn should_outdent_on_empty_first_line<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    event: &KeyEvent,
) -> bool {
    if event.modifiers != Modifiers::NONE || editor.selection().is_some() {
        return false;
    }
    let Some(item_path) = context.list_item_path(editor) else {
        return false;
    };
    let empty = editor
        .document()
        .block_at(&item_path)
        .and_then(Block::as_list_item)
        .is_some_and(|item| item.is_empty_content());
    empty && !has_previous_list_sibling(editor, &item_path)
}

fn outdent_on_empty_first_line<E: Editor>(
    editor: &mut E,
    context: &mut EventContext,
    event: &mut KeyEvent,
) {
    let Some(item_path) = context.list_item_path(editor) else {
        return;
    };
    event.prevent_default();
    editor.add_undo_snapshot(ChangeSource::ListOperation, false, move |ed| {
        toggle_item_off(ed, &item_path);
    });
}

// === Merge into the previous line on Backspace at item start ===

fn should_merge_in_new_line<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    event: &KeyEvent,
) -> bool {
    if event.modifiers != Modifiers::NONE || editor.selection().is_some() {
        return false;
    }
    if !editor.at_paragraph_start() {
        return false;
    }
    let Some(item_path) = context.list_item_path(editor) else {
        return false;
    };
    let point = editor.insert_point();
    // The caret must sit in the item's first content block.
    point.path.len() == item_path.len() + 1
        && point.path.starts_with(&item_path)
        && point.path.ends_with(&[0])
}

fn merge_in_new_line<E: Editor>(editor: &mut E, context: &mut EventContext, event: &mut KeyEvent) {
    let Some(item_path) = context.list_item_path(editor) else {
        return;
    };
    event.prevent_default();
    if has_previous_list_sibling(editor, &item_path) {
        let region = parent_path(&item_path);
        let chains = region_chains(editor, &region);
        editor.add_undo_snapshot(ChangeSource::ListOperation, false, move |ed| {
            merge_item_into_previous(ed, &item_path);
        });
        schedule_chain_commit(editor, region, chains);
    } else {
        editor.add_undo_snapshot(ChangeSource::ListOperation, false, move |ed| {
            toggle_item_off(ed, &item_path);
        });
    }
}

/// Soft outdent: fold the item's content into the previous sibling item
/// and drop the now-empty item, leaving the caret at the junction.
fn merge_item_into_previous<E: Editor>(editor: &mut E, item_path: &[usize]) {
    let Some((&index, parent)) = item_path.split_last() else {
        return;
    };
    let parent: BlockPath = parent.to_vec();
    let caret = {
        let Some(blocks) = editor.document_mut().blocks_of_mut(&parent) else {
            return;
        };
        if index == 0 || index >= blocks.len() {
            return;
        }
        let current = match blocks.remove(index) {
            Block::ListItem(item) => item,
            other => {
                blocks.insert(index, other);
                return;
            }
        };
        let Some(previous) = blocks.get_mut(index - 1).and_then(Block::as_list_item_mut) else {
            blocks.insert(index, Block::ListItem(current));
            return;
        };
        let mut first_paragraph: Option<Paragraph> = None;
        let mut rest: Vec<Block> = Vec::new();
        for block in current.blocks {
            match block {
                Block::Paragraph(paragraph) if first_paragraph.is_none() => {
                    first_paragraph = Some(paragraph);
                }
                other => rest.push(other),
            }
        }
        let caret = match first_paragraph {
            Some(merged) => {
                match previous
                    .blocks
                    .iter()
                    .rposition(|block| matches!(block, Block::Paragraph(_)))
                {
                    Some(child) => previous.blocks[child].as_paragraph_mut().map(|target| {
                        let junction = target.char_len();
                        target.append_segments(merged.segments);
                        (child, junction)
                    }),
                    None => {
                        previous.blocks.push(Block::Paragraph(merged));
                        Some((previous.blocks.len() - 1, 0))
                    }
                }
            }
            None => None,
        };
        previous.blocks.extend(rest);
        caret
    };
    if let Some((child, offset)) = caret {
        let mut path = parent;
        path.push(index - 1);
        path.push(child);
        editor.set_insert_point(InsertPoint::new(path, offset));
        editor.set_selection(None);
    }
}

// === Merge two lists when Backspace removes the block between them ===

fn should_merge_lists_on_backspace<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    event: &KeyEvent,
) -> bool {
    if event.modifiers != Modifiers::NONE || editor.selection().is_some() {
        return false;
    }
    if context.list_item_path(editor).is_some() {
        return false;
    }
    if !context.text_before_cursor(editor).is_empty() || context.has_entity_before_cursor(editor) {
        return false;
    }
    let point = editor.insert_point();
    let Some((&index, parent)) = point.path.split_last() else {
        return false;
    };
    if index == 0 {
        return false;
    }
    let Some(blocks) = editor.document().blocks_of(parent) else {
        return false;
    };
    let before = blocks
        .get(index - 1)
        .and_then(Block::as_list_item)
        .and_then(|item| item.list_type());
    let beyond = blocks
        .get(index + 1)
        .and_then(Block::as_list_item)
        .and_then(|item| item.list_type());
    matches!((before, beyond), (Some(a), Some(b)) if a == b)
}

fn merge_lists_on_backspace<E: Editor>(
    editor: &mut E,
    _context: &mut EventContext,
    event: &mut KeyEvent,
) {
    event.prevent_default();
    let point = editor.insert_point();
    let Some((&index, parent)) = point.path.split_last() else {
        return;
    };
    let parent: BlockPath = parent.to_vec();
    let region = parent.clone();
    let chains = region_chains(editor, &region);
    editor.add_undo_snapshot(ChangeSource::ListOperation, false, move |ed| {
        let caret = {
            let Some(blocks) = ed.document_mut().blocks_of_mut(&parent) else {
                return;
            };
            if index == 0 || index >= blocks.len() {
                return;
            }
            let current = match blocks.remove(index) {
                Block::Paragraph(paragraph) => paragraph,
                other => {
                    blocks.insert(index, other);
                    return;
                }
            };
            // The trailing list now continues the leading one; its stale
            // start override must not survive the merge.
            if let Some(item) = blocks.get_mut(index).and_then(Block::as_list_item_mut) {
                if let Some(level) = item.levels.first_mut() {
                    level.format.start_number_override = None;
                }
            }
            let Some(previous) = blocks.get_mut(index - 1).and_then(Block::as_list_item_mut)
            else {
                blocks.insert(index, Block::Paragraph(current));
                return;
            };
            // A temporary marker rides across the merge so the caret can
            // be re-resolved afterwards.
            let child = match previous
                .blocks
                .iter()
                .rposition(|block| matches!(block, Block::Paragraph(_)))
            {
                Some(child) => {
                    if let Some(target) = previous.blocks[child].as_paragraph_mut() {
                        target.insert_marker(target.char_len());
                        target.append_segments(current.segments);
                    }
                    child
                }
                None => {
                    let mut paragraph = Paragraph::new();
                    paragraph.insert_marker(0);
                    paragraph.append_segments(current.segments);
                    previous.blocks.push(Block::Paragraph(paragraph));
                    previous.blocks.len() - 1
                }
            };
            let offset = previous
                .blocks
                .get_mut(child)
                .and_then(Block::as_paragraph_mut)
                .and_then(Paragraph::take_marker)
                .unwrap_or(0);
            Some((child, offset))
        };
        if let Some((child, offset)) = caret {
            let mut path = parent;
            path.push(index - 1);
            path.push(child);
            ed.set_insert_point(InsertPoint::new(path, offset));
            ed.set_selection(None);
        }
    });
    schedule_chain_commit(editor, region, chains);
}

// === Outdent on Enter in an empty item ===

fn should_outdent_on_enter_on_empty_line<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    event: &KeyEvent,
) -> bool {
    if event.modifiers != Modifiers::NONE || editor.selection().is_some() {
        return false;
    }
    let Some(item_path) = context.list_item_path(editor) else {
        return false;
    };
    editor
        .document()
        .block_at(&item_path)
        .and_then(Block::as_list_item)
        .is_some_and(|item| item.is_empty_content())
}

fn outdent_on_enter_on_empty_line<E: Editor>(
    editor: &mut E,
    context: &mut EventContext,
    event: &mut KeyEvent,
) {
    let Some(item_path) = context.list_item_path(editor) else {
        return;
    };
    event.prevent_default();
    let region = parent_path(&item_path);
    let chains = region_chains(editor, &region);
    // Backspace right after this Enter pops the snapshot and restores the
    // item.
    editor.add_undo_snapshot(ChangeSource::ListOperation, true, move |ed| {
        toggle_item_off(ed, &item_path);
    });
    schedule_chain_commit(editor, region, chains);
}

// === Indent / outdent on Tab ===

fn should_indent_on_tab<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    event: &KeyEvent,
) -> bool {
    event.modifiers == Modifiers::NONE && !target_items(editor, context).is_empty()
}

fn indent_on_tab<E: Editor>(editor: &mut E, context: &mut EventContext, event: &mut KeyEvent) {
    let targets = target_items(editor, context);
    let Some(first) = targets.first() else {
        return;
    };
    event.prevent_default();
    let region = parent_path(first);
    let chains = region_chains(editor, &region);
    editor.add_undo_snapshot(ChangeSource::ListOperation, false, move |ed| {
        for path in &targets {
            if let Some(item) = ed
                .document_mut()
                .block_at_mut(path)
                .and_then(Block::as_list_item_mut)
            {
                item.indent();
            }
        }
    });
    schedule_chain_commit(editor, region, chains);
}

fn should_outdent_on_shift_tab<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    event: &KeyEvent,
) -> bool {
    event.modifiers == Modifiers::SHIFT && !target_items(editor, context).is_empty()
}

fn outdent_on_shift_tab<E: Editor>(editor: &mut E, context: &mut EventContext, event: &mut KeyEvent) {
    let targets = target_items(editor, context);
    let Some(first) = targets.first() else {
        return;
    };
    event.prevent_default();
    let region = parent_path(first);
    let chains = region_chains(editor, &region);
    editor.add_undo_snapshot(ChangeSource::ListOperation, false, move |ed| {
        if let [path] = targets.as_slice() {
            let outdented = ed
                .document_mut()
                .block_at_mut(path)
                .and_then(Block::as_list_item_mut)
                .map(|item| item.outdent());
            // Shift-Tab at the outermost depth turns the list off.
            if outdented == Some(false) {
                toggle_item_off(ed, path);
            }
            return;
        }
        for path in &targets {
            if let Some(item) = ed
                .document_mut()
                .block_at_mut(path)
                .and_then(Block::as_list_item_mut)
            {
                item.outdent();
            }
        }
    });
    schedule_chain_commit(editor, region, chains);
}

// === Auto-format (experimental inference path) ===

fn should_auto_bullet_list<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    _event: &KeyEvent,
) -> bool {
    editor.is_feature_enabled(ExperimentalFlag::AutoBulletList)
        && context
            .inferred_list_style(editor)
            .is_some_and(|inferred| matches!(inferred.style, ListStyleType::Bullet(_)))
}

fn should_auto_numbering_list<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    _event: &KeyEvent,
) -> bool {
    editor.is_feature_enabled(ExperimentalFlag::AutoNumberingList)
        && context
            .inferred_list_style(editor)
            .is_some_and(|inferred| matches!(inferred.style, ListStyleType::Numbering(_)))
}

fn auto_format_list<E: Editor>(editor: &mut E, context: &mut EventContext, event: &mut KeyEvent) {
    let Some(inferred) = context.inferred_list_style(editor) else {
        return;
    };
    let marker_chars = context.text_before_cursor(editor).chars().count();
    event.prevent_default();
    convert_marker_to_list(editor, marker_chars, inferred.style, inferred.start_number);
}

// === Auto-bullet (legacy path) ===

fn should_auto_bullet<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    _event: &KeyEvent,
) -> bool {
    // The legacy recognizer yields entirely to the experimental one.
    if editor.is_feature_enabled(ExperimentalFlag::AutoBulletList)
        || editor.is_feature_enabled(ExperimentalFlag::AutoNumberingList)
    {
        return false;
    }
    if context.list_item_path(editor).is_some() || context.has_entity_before_cursor(editor) {
        return false;
    }
    legacy_trigger(context.text_before_cursor(editor)).is_some()
}

fn auto_bullet<E: Editor>(editor: &mut E, context: &mut EventContext, event: &mut KeyEvent) {
    let marker = context.text_before_cursor(editor).to_owned();
    let Some(trigger) = legacy_trigger(&marker) else {
        return;
    };
    event.prevent_default();
    let marker_chars = marker.chars().count();
    match trigger {
        LegacyTrigger::Bullet => convert_marker_to_list(
            editor,
            marker_chars,
            ListStyleType::Bullet(BulletListType::Disc),
            None,
        ),
        LegacyTrigger::Numbering { start } => convert_marker_to_list(
            editor,
            marker_chars,
            ListStyleType::Numbering(NumberingListType::Decimal),
            Some(start),
        ),
    }
}

// === Chain maintenance ===

fn should_maintain_chain_when_delete<E: Editor>(
    editor: &E,
    context: &mut EventContext,
    event: &KeyEvent,
) -> bool {
    if event.modifiers != Modifiers::NONE || editor.selection().is_some() {
        return false;
    }
    if context.list_item_path(editor).is_some() || !editor.at_paragraph_end() {
        return false;
    }
    // Deleting forward from here reaches into a list.
    let point = editor.insert_point();
    let Some((&index, parent)) = point.path.split_last() else {
        return false;
    };
    editor
        .document()
        .blocks_of(parent)
        .and_then(|blocks| blocks.get(index + 1))
        .is_some_and(Block::is_list_item)
}

fn maintain_chain_when_delete<E: Editor>(
    editor: &mut E,
    _context: &mut EventContext,
    _event: &mut KeyEvent,
) {
    let point = editor.insert_point();
    let region = parent_path(&point.path);
    let chains = region_chains(editor, &region);
    schedule_chain_commit(editor, region, chains);
}

fn should_maintain_chain<E: Editor>(
    editor: &E,
    _context: &mut EventContext,
    _event: &KeyEvent,
) -> bool {
    editor.selection_intersects_list()
}

fn maintain_chain<E: Editor>(editor: &mut E, context: &mut EventContext, _event: &mut KeyEvent) {
    let region = chain_region(editor, context);
    let chains = region_chains(editor, &region);
    schedule_chain_commit(editor, region, chains);
}

/// The sibling sequence whose chains the current selection affects.
fn chain_region<E: Editor>(editor: &E, context: &mut EventContext) -> BlockPath {
    if let Some(item_path) = context.list_item_path(editor) {
        return parent_path(&item_path);
    }
    if let Some(selection) = editor.selection() {
        if let Some(path) = editor
            .document()
            .list_item_paths()
            .into_iter()
            .find(|path| path_in_range(path, &selection.start.path, &selection.end.path))
        {
            return parent_path(&path);
        }
    }
    Vec::new()
}
