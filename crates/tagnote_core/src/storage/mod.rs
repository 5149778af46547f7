//! Key-value persistence contract and backends.
//!
//! # Responsibility
//! - Define the narrow `get`/`set` contract persistent slots write through.
//! - Provide an in-process backend and a durable SQLite backend.
//!
//! # Invariants
//! - Values are opaque serialized text; backends never inspect them.
//! - A key that was never written reads as `None`, not as an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport-level failure while reading or writing a slot.
///
/// Corrupt stored values are not errors; slots fall back instead.
#[derive(Debug)]
pub enum StorageError {
    /// Backend database failure.
    Db(DbError),
    /// In-memory value could not be serialized for `key`.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => {
                write!(f, "failed to encode value for key `{key}`: {source}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named-slot key-value store holding serialized values.
pub trait KeyValueStore {
    /// Returns the raw value stored at `key`, or `None` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Stores `value` at `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
