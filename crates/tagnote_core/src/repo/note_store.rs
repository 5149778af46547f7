//! Note set bound to the `NOTES` slot.
//!
//! # Invariants
//! - Note ids are generated here and are unique within the set.
//! - `update` never changes a note's id or position.
//! - No tag validation happens here; dangling tag ids are allowed.

use crate::model::note::{NormalizedNote, NoteDraft, NoteId};
use crate::model::tag::TagId;
use crate::repo::slot::{PersistentSlot, SlotVersion};
use crate::storage::{KeyValueStore, StorageResult};

/// Normalized notes in insertion order.
#[derive(Debug, Clone)]
pub struct NoteStore {
    slot: PersistentSlot<Vec<NormalizedNote>>,
}

impl NoteStore {
    /// Loads notes from `key`, starting empty when absent or corrupt.
    pub fn load<S>(store: &S, key: impl Into<String>) -> StorageResult<Self>
    where
        S: KeyValueStore + ?Sized,
    {
        Ok(Self {
            slot: PersistentSlot::load_with(store, key, Vec::new)?,
        })
    }

    pub fn notes(&self) -> &[NormalizedNote] {
        self.slot.get()
    }

    pub fn get(&self, id: &NoteId) -> Option<&NormalizedNote> {
        self.notes().iter().find(|note| &note.id == id)
    }

    pub fn version(&self) -> SlotVersion {
        self.slot.version()
    }

    /// Appends a note built from `draft` and returns its new id.
    pub fn create<S>(&mut self, store: &mut S, draft: NoteDraft) -> StorageResult<NoteId>
    where
        S: KeyValueStore + ?Sized,
    {
        let id = self.fresh_id();
        let next = with_note_added(self.notes(), draft.into_note(id.clone()));
        self.slot.set(store, next)?;
        Ok(id)
    }

    /// Replaces title, body and tag ids of note `id`. Returns `false` if
    /// the note does not exist.
    pub fn update<S>(&mut self, store: &mut S, id: &NoteId, draft: NoteDraft) -> StorageResult<bool>
    where
        S: KeyValueStore + ?Sized,
    {
        match with_note_replaced(self.notes(), id, draft) {
            Some(next) => self.slot.set(store, next).map(|()| true),
            None => Ok(false),
        }
    }

    /// Removes note `id`. Returns `false` if the note does not exist.
    pub fn delete<S>(&mut self, store: &mut S, id: &NoteId) -> StorageResult<bool>
    where
        S: KeyValueStore + ?Sized,
    {
        match without_note(self.notes(), id) {
            Some(next) => self.slot.set(store, next).map(|()| true),
            None => Ok(false),
        }
    }

    /// Drops `tag_id` from every note referencing it and returns how many
    /// notes changed.
    pub fn strip_tag<S>(&mut self, store: &mut S, tag_id: &TagId) -> StorageResult<usize>
    where
        S: KeyValueStore + ?Sized,
    {
        let (next, changed) = with_tag_stripped(self.notes(), tag_id);
        if changed > 0 {
            self.slot.set(store, next)?;
        }
        Ok(changed)
    }

    pub(crate) fn flush<S>(&self, store: &mut S) -> StorageResult<()>
    where
        S: KeyValueStore + ?Sized,
    {
        self.slot.flush(store)
    }

    fn fresh_id(&self) -> NoteId {
        loop {
            let id = NoteId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

fn with_note_added(notes: &[NormalizedNote], note: NormalizedNote) -> Vec<NormalizedNote> {
    let mut next = Vec::with_capacity(notes.len() + 1);
    next.extend_from_slice(notes);
    next.push(note);
    next
}

fn with_note_replaced(
    notes: &[NormalizedNote],
    id: &NoteId,
    draft: NoteDraft,
) -> Option<Vec<NormalizedNote>> {
    let position = notes.iter().position(|note| &note.id == id)?;
    let mut next = notes.to_vec();
    next[position] = draft.into_note(id.clone());
    Some(next)
}

fn without_note(notes: &[NormalizedNote], id: &NoteId) -> Option<Vec<NormalizedNote>> {
    let next: Vec<NormalizedNote> = notes.iter().filter(|note| &note.id != id).cloned().collect();
    (next.len() != notes.len()).then_some(next)
}

fn with_tag_stripped(notes: &[NormalizedNote], tag_id: &TagId) -> (Vec<NormalizedNote>, usize) {
    let mut changed = 0;
    let next: Vec<NormalizedNote> = notes
        .iter()
        .map(|note| {
            if !note.tag_ids.contains(tag_id) {
                return note.clone();
            }
            changed += 1;
            NormalizedNote {
                tag_ids: note
                    .tag_ids
                    .iter()
                    .filter(|current| *current != tag_id)
                    .cloned()
                    .collect(),
                ..note.clone()
            }
        })
        .collect();
    (next, changed)
}
