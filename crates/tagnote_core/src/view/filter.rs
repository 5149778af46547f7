//! Title and tag filters over resolved notes.
//!
//! # Invariants
//! - Empty title and empty tag selection each match everything.
//! - Title matching is a case-insensitive substring test.
//! - Tag matching requires every selected tag, not any.

use crate::model::note::ResolvedNote;
use crate::model::tag::TagId;

/// Combined list filter; a note must pass both parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub title: String,
    pub tag_ids: Vec<TagId>,
}

impl NoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_tag(mut self, tag_id: impl Into<TagId>) -> Self {
        self.tag_ids.push(tag_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.tag_ids.is_empty()
    }

    pub fn matches(&self, note: &ResolvedNote) -> bool {
        title_matches(&self.title, &note.title) && has_all_tags(&self.tag_ids, note)
    }

    /// Notes passing the filter, in input order.
    pub fn apply<'a>(&self, notes: &'a [ResolvedNote]) -> Vec<&'a ResolvedNote> {
        notes.iter().filter(|note| self.matches(note)).collect()
    }
}

fn title_matches(needle: &str, title: &str) -> bool {
    needle.is_empty() || title.to_lowercase().contains(&needle.to_lowercase())
}

fn has_all_tags(selected: &[TagId], note: &ResolvedNote) -> bool {
    selected.iter().all(|tag_id| note.has_tag(tag_id))
}

#[cfg(test)]
mod tests {
    use super::NoteFilter;
    use crate::model::note::{NoteId, ResolvedNote};
    use crate::model::tag::Tag;

    fn notes() -> Vec<ResolvedNote> {
        vec![
            ResolvedNote {
                id: NoteId::from("1"),
                title: "Meeting".to_string(),
                body: String::new(),
                tags: vec![Tag::with_id("work", "Work")],
            },
            ResolvedNote {
                id: NoteId::from("2"),
                title: "Recipe".to_string(),
                body: String::new(),
                tags: vec![Tag::with_id("food", "Food")],
            },
        ]
    }

    fn ids(filter: &NoteFilter) -> Vec<String> {
        filter
            .apply(&notes())
            .into_iter()
            .map(|note| note.id.to_string())
            .collect()
    }

    #[test]
    fn empty_filter_matches_all() {
        assert!(NoteFilter::new().is_empty());
        assert_eq!(ids(&NoteFilter::new()), vec!["1", "2"]);
    }

    #[test]
    fn title_is_case_insensitive_substring() {
        assert_eq!(ids(&NoteFilter::new().with_title("meet")), vec!["1"]);
        assert_eq!(ids(&NoteFilter::new().with_title("CIP")), vec!["2"]);
    }

    #[test]
    fn selected_tags_must_all_be_present() {
        let both = NoteFilter::new().with_tag("work").with_tag("food");
        assert!(ids(&both).is_empty());
        assert_eq!(ids(&NoteFilter::new().with_tag("work")), vec!["1"]);
    }

    #[test]
    fn title_and_tags_combine_with_and() {
        let filter = NoteFilter::new().with_title("recipe").with_tag("work");
        assert!(ids(&filter).is_empty());
    }
}
