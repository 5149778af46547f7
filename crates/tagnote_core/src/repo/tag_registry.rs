//! Tag set bound to the `TAGS` slot.
//!
//! # Invariants
//! - The registry never deduplicates by id or label; callers mint ids.
//! - Renaming or removing a tag never touches notes.

use crate::model::tag::{Tag, TagId};
use crate::repo::slot::{PersistentSlot, SlotVersion};
use crate::storage::{KeyValueStore, StorageResult};

/// Registered tags in insertion order.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    slot: PersistentSlot<Vec<Tag>>,
}

impl TagRegistry {
    /// Loads the registry from `key`, starting empty when absent or corrupt.
    pub fn load<S>(store: &S, key: impl Into<String>) -> StorageResult<Self>
    where
        S: KeyValueStore + ?Sized,
    {
        Ok(Self {
            slot: PersistentSlot::load_with(store, key, Vec::new)?,
        })
    }

    pub fn tags(&self) -> &[Tag] {
        self.slot.get()
    }

    pub fn version(&self) -> SlotVersion {
        self.slot.version()
    }

    /// Appends `tag` as given.
    pub fn add<S>(&mut self, store: &mut S, tag: Tag) -> StorageResult<()>
    where
        S: KeyValueStore + ?Sized,
    {
        let next = with_tag_added(self.tags(), tag);
        self.slot.set(store, next)
    }

    /// Relabels the tag with `id`. Returns `false` (and writes nothing) if
    /// no such tag exists.
    pub fn rename<S>(&mut self, store: &mut S, id: &TagId, label: &str) -> StorageResult<bool>
    where
        S: KeyValueStore + ?Sized,
    {
        match with_tag_renamed(self.tags(), id, label) {
            Some(next) => self.slot.set(store, next).map(|()| true),
            None => Ok(false),
        }
    }

    /// Drops every tag with `id`. Returns `false` if none matched.
    pub fn remove<S>(&mut self, store: &mut S, id: &TagId) -> StorageResult<bool>
    where
        S: KeyValueStore + ?Sized,
    {
        match without_tag(self.tags(), id) {
            Some(next) => self.slot.set(store, next).map(|()| true),
            None => Ok(false),
        }
    }

    pub(crate) fn flush<S>(&self, store: &mut S) -> StorageResult<()>
    where
        S: KeyValueStore + ?Sized,
    {
        self.slot.flush(store)
    }
}

fn with_tag_added(tags: &[Tag], tag: Tag) -> Vec<Tag> {
    let mut next = Vec::with_capacity(tags.len() + 1);
    next.extend_from_slice(tags);
    next.push(tag);
    next
}

fn with_tag_renamed(tags: &[Tag], id: &TagId, label: &str) -> Option<Vec<Tag>> {
    if !tags.iter().any(|tag| &tag.id == id) {
        return None;
    }
    Some(
        tags.iter()
            .map(|tag| {
                if &tag.id == id {
                    Tag::with_id(tag.id.clone(), label)
                } else {
                    tag.clone()
                }
            })
            .collect(),
    )
}

fn without_tag(tags: &[Tag], id: &TagId) -> Option<Vec<Tag>> {
    let next: Vec<Tag> = tags.iter().filter(|tag| &tag.id != id).cloned().collect();
    (next.len() != tags.len()).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::{with_tag_added, with_tag_renamed, without_tag};
    use crate::model::tag::{Tag, TagId};

    fn sample() -> Vec<Tag> {
        vec![Tag::with_id("a", "work"), Tag::with_id("b", "food")]
    }

    #[test]
    fn add_keeps_duplicate_labels() {
        let next = with_tag_added(&sample(), Tag::with_id("c", "work"));
        assert_eq!(next.len(), 3);
        assert_eq!(next[2].id, TagId::from("c"));
    }

    #[test]
    fn rename_only_touches_matching_id() {
        let next = with_tag_renamed(&sample(), &TagId::from("b"), "cooking").unwrap();
        assert_eq!(next[0].label, "work");
        assert_eq!(next[1].label, "cooking");
    }

    #[test]
    fn rename_or_remove_of_unknown_id_yields_nothing() {
        assert!(with_tag_renamed(&sample(), &TagId::from("zz"), "x").is_none());
        assert!(without_tag(&sample(), &TagId::from("zz")).is_none());
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let mut tags = sample();
        tags.push(Tag::with_id("c", "misc"));
        let next = without_tag(&tags, &TagId::from("b")).unwrap();
        let ids: Vec<&str> = next.iter().map(|tag| tag.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
