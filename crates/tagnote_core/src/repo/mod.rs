//! Authoritative note/tag state bound to persistent slots.
//!
//! # Responsibility
//! - `PersistentSlot` mirrors one in-memory value into one store key.
//! - `TagRegistry` and `NoteStore` own the tag and note collections.
//!
//! # Invariants
//! - Every state change is a pure transformation producing a new
//!   collection, committed through the owning slot.
//! - Unknown ids make update/delete a silent no-op, with no write.
//! - Slots are independent; there is no cross-slot transaction.

pub mod note_store;
pub mod slot;
pub mod tag_registry;
