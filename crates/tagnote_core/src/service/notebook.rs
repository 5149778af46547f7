//! Notebook facade: the only mutation entry point for notes and tags.
//!
//! # Responsibility
//! - Own the key-value backend plus the `NOTES` and `TAGS` state.
//! - Project `Tag` inputs to ids before delegating to the note store.
//! - Apply the configured `TagDeletePolicy` when a tag is deleted.
//!
//! # Invariants
//! - Ids are assigned here or by `Tag::new`, never edited afterwards.
//! - Unknown ids turn update/delete/rename into silent no-ops.
//! - Tags referenced by a note must be registered via `add_tag` first;
//!   unregistered ids are kept but never resolve.
//! - Single writer: every method runs to completion before the next.

use crate::config::{NoteBookConfig, TagDeletePolicy};
use crate::model::note::{NormalizedNote, NoteDraft, NoteId, ResolvedNote};
use crate::model::tag::{Tag, TagId};
use crate::repo::note_store::NoteStore;
use crate::repo::tag_registry::TagRegistry;
use crate::storage::{KeyValueStore, StorageResult};
use crate::view::filter::NoteFilter;
use crate::view::join::{resolve_one, JoinView};
use log::{debug, info};

/// Owned note/tag store over a key-value backend `S`.
pub struct NoteBook<S: KeyValueStore> {
    store: S,
    config: NoteBookConfig,
    notes: NoteStore,
    tags: TagRegistry,
    view: JoinView,
}

impl<S: KeyValueStore> NoteBook<S> {
    /// Opens a notebook with default keys and policy.
    pub fn open(store: S) -> StorageResult<Self> {
        Self::open_with_config(store, NoteBookConfig::default())
    }

    /// Loads both slots from `store`.
    ///
    /// Absent or corrupt slots start empty; nothing is written until the
    /// first mutation.
    pub fn open_with_config(store: S, config: NoteBookConfig) -> StorageResult<Self> {
        let notes = NoteStore::load(&store, config.notes_key.as_str())?;
        let tags = TagRegistry::load(&store, config.tags_key.as_str())?;
        info!(
            "event=notebook_open module=service status=ok notes={} tags={} tag_delete_policy={:?}",
            notes.notes().len(),
            tags.tags().len(),
            config.tag_delete_policy
        );
        Ok(Self {
            store,
            config,
            notes,
            tags,
            view: JoinView::new(),
        })
    }

    /// The backend as last written, which may lag in-memory state after a
    /// failed write.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Closes the notebook and hands back the backend.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Creates a note referencing `tags` by id and returns the new id.
    pub fn create_note(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: &[Tag],
    ) -> StorageResult<NoteId> {
        let draft = NoteDraft::from_tags(title, body, tags);
        let tag_count = draft.tag_ids.len();
        let id = self.notes.create(&mut self.store, draft)?;
        info!("event=note_create module=service status=ok note_id={id} tag_count={tag_count}");
        Ok(id)
    }

    /// Replaces title, body and tags of note `id`. Returns `false` when the
    /// note does not exist.
    pub fn update_note(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: &[Tag],
    ) -> StorageResult<bool> {
        let draft = NoteDraft::from_tags(title, body, tags);
        let updated = self.notes.update(&mut self.store, id, draft)?;
        log_outcome("note_update", "note_id", id.as_str(), updated);
        Ok(updated)
    }

    /// Deletes note `id`. Returns `false` when the note does not exist.
    pub fn delete_note(&mut self, id: &NoteId) -> StorageResult<bool> {
        let deleted = self.notes.delete(&mut self.store, id)?;
        log_outcome("note_delete", "note_id", id.as_str(), deleted);
        Ok(deleted)
    }

    /// Registers a tag minted by the caller (see `Tag::new`).
    pub fn add_tag(&mut self, tag: Tag) -> StorageResult<()> {
        let id = tag.id.clone();
        self.tags.add(&mut self.store, tag)?;
        info!("event=tag_add module=service status=ok tag_id={id}");
        Ok(())
    }

    /// Relabels tag `id`. Notes pick the new label up on the next read.
    pub fn rename_tag(&mut self, id: &TagId, label: impl Into<String>) -> StorageResult<bool> {
        let label = label.into();
        let renamed = self.tags.rename(&mut self.store, id, &label)?;
        log_outcome("tag_rename", "tag_id", id.as_str(), renamed);
        Ok(renamed)
    }

    /// Removes tag `id` from the registry, then applies the configured
    /// `TagDeletePolicy` to notes referencing it.
    ///
    /// Both in-memory changes always happen. If either slot write fails the
    /// first error is returned and `flush` persists the finished state.
    pub fn delete_tag(&mut self, id: &TagId) -> StorageResult<bool> {
        let removed = self.tags.remove(&mut self.store, id);
        let stripped = match self.config.tag_delete_policy {
            TagDeletePolicy::RetainReferences => Ok(0),
            TagDeletePolicy::StripReferences => self.notes.strip_tag(&mut self.store, id),
        };
        let (removed, stripped) = (removed?, stripped?);
        if removed || stripped > 0 {
            info!(
                "event=tag_delete module=service status=ok tag_id={id} removed={removed} notes_rewritten={stripped}"
            );
        } else {
            debug!("event=tag_delete module=service status=noop tag_id={id}");
        }
        Ok(removed)
    }

    /// Writes both slots again, e.g. after a failed write.
    pub fn flush(&mut self) -> StorageResult<()> {
        self.notes.flush(&mut self.store)?;
        self.tags.flush(&mut self.store)
    }

    /// All notes with resolved tags, in creation order.
    pub fn list_resolved_notes(&mut self) -> &[ResolvedNote] {
        self.view.resolved(&self.notes, &self.tags)
    }

    /// Resolved notes passing `filter`, in creation order.
    pub fn search_notes(&mut self, filter: &NoteFilter) -> Vec<ResolvedNote> {
        filter
            .apply(self.view.resolved(&self.notes, &self.tags))
            .into_iter()
            .cloned()
            .collect()
    }

    /// One note with resolved tags, if it exists.
    pub fn get_note(&self, id: &NoteId) -> Option<ResolvedNote> {
        self.notes
            .get(id)
            .map(|note| resolve_one(note, self.tags.tags()))
    }

    /// Notes in their persisted form.
    pub fn list_notes(&self) -> &[NormalizedNote] {
        self.notes.notes()
    }

    /// Registered tags in insertion order.
    pub fn list_tags(&self) -> &[Tag] {
        self.tags.tags()
    }
}

fn log_outcome(event: &str, id_field: &str, id: &str, applied: bool) {
    if applied {
        info!("event={event} module=service status=ok {id_field}={id}");
    } else {
        debug!("event={event} module=service status=noop reason=not_found {id_field}={id}");
    }
}
