//! vellum-editor-core: the list editing feature layer of the vellum core.
//!
//! This crate provides:
//! - `Editor` trait for the host surface, with `PlainEditor` as the
//!   field-based implementation
//! - the `ListFeature` registry and `handle_key_event` dispatcher
//! - list style inference, auto-bullet triggers, list chains, and
//!   delete-selection collapse
//! - undo snapshots and the single-slot deferred queue the chain pass
//!   runs on
//!
//! The content model itself lives in `vellum-model`.

pub mod autobullet;
pub mod chain;
pub mod collapse;
pub mod context;
pub mod deferred;
pub mod editor;
pub mod features;
pub mod infer;
pub mod keys;
pub mod undo;

pub use autobullet::{LEGACY_MARKER_WINDOW, LegacyTrigger, legacy_trigger};
pub use chain::{
    ChainMember, ListChain, ListKey, ListRegion, ListSegment, commit_chains, compute_chains,
    scan_segments,
};
pub use collapse::{DeleteContext, DeleteKind, collapse_deleted_list_item};
pub use context::EventContext;
pub use deferred::{DeferredQueue, DeferredTask};
pub use editor::{
    Editor, ExperimentalFlag, ExperimentalFlags, PlainEditor, SelectionRange, get_list_style_type,
};
pub use features::{
    ListFeature, ListFeatureKind, drain_deferred, handle_key_event, list_features,
};
pub use infer::{InferredListStyle, MARKER_WINDOW, infer_list_style};
pub use keys::{Key, KeyEvent, KeydownResult, Modifiers};
pub use undo::{ChangeSource, Snapshot, SnapshotStack};
