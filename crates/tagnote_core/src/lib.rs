//! Core domain logic for TagNote.
//!
//! A single-user notebook of markdown notes labelled with tags, persisted
//! through a narrow key-value contract. Notes store tag ids only; the
//! tag-resolved view is derived on read.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use config::{NoteBookConfig, TagDeletePolicy, DEFAULT_NOTES_KEY, DEFAULT_TAGS_KEY};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NormalizedNote, NoteDraft, NoteId, ResolvedNote};
pub use model::tag::{Tag, TagId};
pub use repo::note_store::NoteStore;
pub use repo::slot::PersistentSlot;
pub use repo::tag_registry::TagRegistry;
pub use service::notebook::NoteBook;
pub use storage::{KeyValueStore, MemoryKvStore, SqliteKvStore, StorageError, StorageResult};
pub use view::filter::NoteFilter;
pub use view::join::{resolve, JoinView};
