//! Persisted list-style hints in the per-level dataset.
//!
//! A level's resolved style is stored as a small JSON payload under the
//! `editing-info` dataset key, so later triggers can continue the same
//! style family. Reads are schema-validated: style codes must land inside
//! the enum bounds, and anything malformed is absorbed to `None` (logged
//! at debug level, never surfaced to callers).

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::list::ListType;
use crate::style::{BulletListType, ListStyleType, NumberingListType};

/// Dataset key the style payload is stored under.
pub const EDITING_INFO_KEY: &str = "editing-info";

/// The persisted payload. Both fields are optional; codes are the
/// numeric encodings from `style`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListMetadata {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ordered_style_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unordered_style_type: Option<i32>,
}

impl ListMetadata {
    pub fn from_style(style: ListStyleType) -> Self {
        match style {
            ListStyleType::Bullet(bullet) => Self {
                ordered_style_type: None,
                unordered_style_type: Some(bullet.code()),
            },
            ListStyleType::Numbering(numbering) => Self {
                ordered_style_type: Some(numbering.code()),
                unordered_style_type: None,
            },
        }
    }

    /// The style this payload resolves to for a given list kind.
    pub fn style_for(&self, list_type: ListType) -> Option<ListStyleType> {
        match list_type {
            ListType::Ordered => self
                .ordered_style_type
                .and_then(NumberingListType::from_code)
                .map(ListStyleType::Numbering),
            ListType::Unordered => self
                .unordered_style_type
                .and_then(BulletListType::from_code)
                .map(ListStyleType::Bullet),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("malformed editing-info payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("style code {0} out of range")]
    OutOfRange(i32),
}

fn parse_list_metadata(raw: &str) -> Result<ListMetadata, MetadataError> {
    let metadata: ListMetadata = serde_json::from_str(raw)?;
    if let Some(code) = metadata.ordered_style_type {
        if !(NumberingListType::MIN..=NumberingListType::MAX).contains(&code) {
            return Err(MetadataError::OutOfRange(code));
        }
    }
    if let Some(code) = metadata.unordered_style_type {
        if !(BulletListType::MIN..=BulletListType::MAX).contains(&code) {
            return Err(MetadataError::OutOfRange(code));
        }
    }
    Ok(metadata)
}

/// Read the style payload from a level's dataset. Missing, malformed, or
/// out-of-range payloads all read as `None`.
pub fn read_list_metadata(dataset: &BTreeMap<SmolStr, SmolStr>) -> Option<ListMetadata> {
    let raw = dataset.get(EDITING_INFO_KEY)?;
    match parse_list_metadata(raw) {
        Ok(metadata) => Some(metadata),
        Err(error) => {
            tracing::debug!(target: "vellum::metadata", %error, "ignoring bad editing-info");
            None
        }
    }
}

/// Write the style payload into a level's dataset.
pub fn write_list_metadata(dataset: &mut BTreeMap<SmolStr, SmolStr>, metadata: &ListMetadata) {
    if let Ok(raw) = serde_json::to_string(metadata) {
        dataset.insert(SmolStr::new(EDITING_INFO_KEY), SmolStr::new(raw));
    }
}
