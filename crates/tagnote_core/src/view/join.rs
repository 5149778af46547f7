//! Note/tag join with revision-stamped caching.
//!
//! # Invariants
//! - Each resolved note lists registry tags whose id it references, in
//!   registry order; dangling ids are dropped silently.
//! - Note order follows the note store.
//! - The cache is keyed on both slot versions, so a committed change to
//!   either side, or a different store pair, forces recomputation.

use crate::model::note::{NormalizedNote, ResolvedNote};
use crate::model::tag::{Tag, TagId};
use crate::repo::note_store::NoteStore;
use crate::repo::slot::SlotVersion;
use crate::repo::tag_registry::TagRegistry;
use log::trace;
use std::collections::HashSet;

/// Resolves tag references for every note.
pub fn resolve(notes: &[NormalizedNote], tags: &[Tag]) -> Vec<ResolvedNote> {
    notes.iter().map(|note| resolve_one(note, tags)).collect()
}

/// Resolves tag references for a single note.
pub fn resolve_one(note: &NormalizedNote, tags: &[Tag]) -> ResolvedNote {
    let wanted: HashSet<&TagId> = note.tag_ids.iter().collect();
    ResolvedNote {
        id: note.id.clone(),
        title: note.title.clone(),
        body: note.body.clone(),
        tags: tags
            .iter()
            .filter(|tag| wanted.contains(&tag.id))
            .cloned()
            .collect(),
    }
}

/// Versions of the note and tag slots a cached result was built from.
type Stamp = (SlotVersion, SlotVersion);

/// Cached `resolve` output for one note store / tag registry pair.
#[derive(Debug, Clone, Default)]
pub struct JoinView {
    stamp: Option<Stamp>,
    resolved: Vec<ResolvedNote>,
}

impl JoinView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the joined notes, recomputing if either input changed.
    pub fn resolved(&mut self, notes: &NoteStore, tags: &TagRegistry) -> &[ResolvedNote] {
        let stamp = (notes.version(), tags.version());
        if self.stamp != Some(stamp) {
            self.resolved = resolve(notes.notes(), tags.tags());
            self.stamp = Some(stamp);
            trace!(
                "event=join_recompute module=view count={}",
                self.resolved.len()
            );
        }
        &self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, JoinView};
    use crate::model::note::{NormalizedNote, NoteId};
    use crate::model::tag::{Tag, TagId};
    use crate::repo::note_store::NoteStore;
    use crate::repo::tag_registry::TagRegistry;
    use crate::storage::MemoryKvStore;

    fn note(id: &str, tag_ids: &[&str]) -> NormalizedNote {
        NormalizedNote {
            id: NoteId::from(id),
            title: id.to_string(),
            body: String::new(),
            tag_ids: tag_ids.iter().map(|tag| TagId::from(*tag)).collect(),
        }
    }

    fn labels(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(|tag| tag.label.as_str()).collect()
    }

    #[test]
    fn tags_follow_registry_order_not_reference_order() {
        let tags = vec![
            Tag::with_id("a", "alpha"),
            Tag::with_id("b", "beta"),
            Tag::with_id("c", "gamma"),
        ];
        let resolved = resolve(&[note("n", &["c", "a"])], &tags);
        assert_eq!(labels(&resolved[0].tags), vec!["alpha", "gamma"]);
    }

    #[test]
    fn dangling_and_duplicate_references_are_tolerated() {
        let tags = vec![Tag::with_id("a", "alpha")];
        let resolved = resolve(&[note("n", &["gone", "a", "a"])], &tags);
        assert_eq!(labels(&resolved[0].tags), vec!["alpha"]);
    }

    #[test]
    fn note_order_is_preserved() {
        let resolved = resolve(&[note("2", &[]), note("1", &[]), note("3", &[])], &[]);
        let ids: Vec<&str> = resolved.iter().map(|note| note.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn cache_refreshes_after_tag_rename() {
        let mut store = MemoryKvStore::new();
        let mut notes = NoteStore::load(&store, "NOTES").unwrap();
        let mut tags = TagRegistry::load(&store, "TAGS").unwrap();
        let tag = Tag::with_id("t", "old");
        tags.add(&mut store, tag.clone()).unwrap();
        notes
            .create(
                &mut store,
                crate::model::note::NoteDraft::from_tags("n", "", &[tag.clone()]),
            )
            .unwrap();

        let mut view = JoinView::new();
        assert_eq!(labels(&view.resolved(&notes, &tags)[0].tags), vec!["old"]);

        tags.rename(&mut store, &tag.id, "new").unwrap();
        assert_eq!(labels(&view.resolved(&notes, &tags)[0].tags), vec!["new"]);
        assert_eq!(
            view.resolved(&notes, &tags),
            resolve(notes.notes(), tags.tags()).as_slice()
        );
    }

    #[test]
    fn switching_note_stores_is_never_served_from_cache() {
        let mut first_store = MemoryKvStore::new();
        let mut second_store = MemoryKvStore::new();
        let tags = TagRegistry::load(&first_store, "TAGS").unwrap();
        let mut first = NoteStore::load(&first_store, "NOTES").unwrap();
        let mut second = NoteStore::load(&second_store, "NOTES").unwrap();
        first
            .create(&mut first_store, crate::model::note::NoteDraft::from_tags("A", "", &[]))
            .unwrap();
        second
            .create(&mut second_store, crate::model::note::NoteDraft::from_tags("B", "", &[]))
            .unwrap();

        let mut view = JoinView::new();
        assert_eq!(view.resolved(&first, &tags)[0].title, "A");
        assert_eq!(view.resolved(&second, &tags)[0].title, "B");
        assert_eq!(
            view.resolved(&second, &tags),
            resolve(second.notes(), tags.tags()).as_slice()
        );
    }
}
