//! `analysis.updateContent`: overlays that replace file contents on disk.

use crate::common::SourceEdit;
use aswire_core::{
    protocol_object, serde_via_json, Cursor, FromJson, ObjectReader, Problem, ProtocolType,
    Result, ToJson,
};
use serde_json::Value;
use std::collections::BTreeMap;

protocol_object! {
    /// Start overlaying a file with `content`.
    #[derive(Eq, Hash)]
    pub struct AddContentOverlay: tag "type" = "add" {
        required content: String = "content",
    }
}

protocol_object! {
    /// Apply `edits` to the current overlay of a file.
    #[derive(Eq, Hash)]
    pub struct ChangeContentOverlay: tag "type" = "change" {
        required edits: Vec<SourceEdit> = "edits",
    }
}

protocol_object! {
    /// Stop overlaying a file.
    #[derive(Eq, Hash)]
    pub struct RemoveContentOverlay: tag "type" = "remove" {}
}

/// An overlay, discriminated by its `type` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentOverlay {
    Add(AddContentOverlay),
    Change(ChangeContentOverlay),
    Remove(RemoveContentOverlay),
}

impl ContentOverlay {
    pub const TAG: &'static str = "type";

    #[must_use]
    pub fn add(content: impl Into<String>) -> Self {
        Self::Add(AddContentOverlay {
            content: content.into(),
        })
    }

    #[must_use]
    pub fn remove() -> Self {
        Self::Remove(RemoveContentOverlay {})
    }

    /// The wire value of the discriminator.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Change(_) => "change",
            Self::Remove(_) => "remove",
        }
    }
}

impl ProtocolType for ContentOverlay {
    const TYPE_NAME: &'static str = "ContentOverlay";
}

impl FromJson for ContentOverlay {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        let reader = ObjectReader::open(value, Self::TYPE_NAME, cx)?;
        let tag: String = reader.required(Self::TAG)?;
        match tag.as_str() {
            "add" => AddContentOverlay::from_json(value, cx).map(Self::Add),
            "change" => ChangeContentOverlay::from_json(value, cx).map(Self::Change),
            "remove" => RemoveContentOverlay::from_json(value, cx).map(Self::Remove),
            _ => Err(reader.cursor().field(Self::TAG).malformed(Problem::UnknownTag {
                key: Self::TAG,
                found: tag,
            })),
        }
    }
}

impl ToJson for ContentOverlay {
    fn to_json(&self) -> Value {
        match self {
            Self::Add(overlay) => overlay.to_json(),
            Self::Change(overlay) => overlay.to_json(),
            Self::Remove(overlay) => overlay.to_json(),
        }
    }
}

serde_via_json!(ContentOverlay);

protocol_object! {
    /// Params of the `analysis.updateContent` request, keyed by file path.
    #[derive(Eq, Hash)]
    pub struct AnalysisUpdateContentParams {
        required files: BTreeMap<String, ContentOverlay> = "files",
    }
}
