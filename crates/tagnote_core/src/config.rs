//! Notebook configuration.
//!
//! Hosts may deserialize this from their own config files; every field
//! has a default so partial documents are accepted.

use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTES_KEY: &str = "NOTES";
pub const DEFAULT_TAGS_KEY: &str = "TAGS";

/// What deleting a tag does to notes that still reference it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagDeletePolicy {
    /// Leave stale ids in persisted notes; the join drops them on read.
    #[default]
    RetainReferences,
    /// Rewrite every referencing note to drop the deleted id.
    StripReferences,
}

/// Slot keys and cascade behaviour for a `NoteBook`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteBookConfig {
    pub notes_key: String,
    pub tags_key: String,
    pub tag_delete_policy: TagDeletePolicy,
}

impl Default for NoteBookConfig {
    fn default() -> Self {
        Self {
            notes_key: DEFAULT_NOTES_KEY.to_string(),
            tags_key: DEFAULT_TAGS_KEY.to_string(),
            tag_delete_policy: TagDeletePolicy::default(),
        }
    }
}

impl NoteBookConfig {
    pub fn with_tag_delete_policy(mut self, policy: TagDeletePolicy) -> Self {
        self.tag_delete_policy = policy;
        self
    }
}
