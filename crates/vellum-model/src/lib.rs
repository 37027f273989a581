//! vellum-model: the structured content model of the vellum editing core.
//!
//! This crate provides:
//! - the block tree (`Segment`, `Paragraph`, `Block`, `ContentModelDocument`)
//! - list model types (`ListLevel`, `ListItem`)
//! - list style enumerations with their persisted numeric encodings
//! - the dataset metadata codec for per-level style hints
//!
//! It carries no editing behavior; the feature layer lives in
//! `vellum-editor-core`.

pub mod block;
pub mod list;
pub mod metadata;
pub mod style;

pub use block::{
    Block, BlockPath, ContentModelDocument, FormatContainer, InsertPoint, Paragraph, Segment,
    path_in_range, path_successor, set_list_start_number,
};
pub use list::{ListItem, ListLevel, ListLevelFormat, ListType};
pub use metadata::{
    EDITING_INFO_KEY, ListMetadata, MetadataError, read_list_metadata, write_list_metadata,
};
pub use style::{
    BulletListType, ListStyleType, NumberingBase, NumberingListType, NumberingSeparator,
};
