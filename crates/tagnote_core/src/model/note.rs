//! Note domain models.
//!
//! # Responsibility
//! - `NormalizedNote` is the authoritative, persisted record.
//! - `ResolvedNote` is the read model with tag ids replaced by tags.
//!
//! # Invariants
//! - `NormalizedNote.tag_ids` may contain ids missing from the registry;
//!   they resolve to nothing, never to an error.
//! - `ResolvedNote` is never persisted and never mutated in place.

use crate::model::tag::{Tag, TagId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque note identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Mints a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted note shape.
///
/// Serialized as `{ "id", "title", "markdown", "tagIds" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedNote {
    pub id: NoteId,
    pub title: String,
    /// Markdown source text.
    #[serde(rename = "markdown")]
    pub body: String,
    /// Referenced tags in author order. Duplicates are not rejected.
    pub tag_ids: Vec<TagId>,
}

/// Editable note fields, i.e. everything except the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    pub tag_ids: Vec<TagId>,
}

impl NoteDraft {
    /// Builds a draft, projecting `tags` to their ids.
    pub fn from_tags(title: impl Into<String>, body: impl Into<String>, tags: &[Tag]) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tag_ids: tags.iter().map(|tag| tag.id.clone()).collect(),
        }
    }

    pub(crate) fn into_note(self, id: NoteId) -> NormalizedNote {
        NormalizedNote {
            id,
            title: self.title,
            body: self.body,
            tag_ids: self.tag_ids,
        }
    }
}

/// Note with its tag references resolved against the current registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNote {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// Registry order, filtered to the note's tag ids.
    pub tags: Vec<Tag>,
}

impl ResolvedNote {
    /// Returns whether a tag with `tag_id` resolved for this note.
    pub fn has_tag(&self, tag_id: &TagId) -> bool {
        self.tags.iter().any(|tag| &tag.id == tag_id)
    }
}
