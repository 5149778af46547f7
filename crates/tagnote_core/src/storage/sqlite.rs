//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Requires the `kv_entries` table created by `db` migrations.
//! - `set` is a single upsert statement; each write is atomic on its own.
//! - A stored value that is not UTF-8 text reads as absent, like any other
//!   undecodable value.

use super::{KeyValueStore, StorageResult};
use crate::db::DbError;
use log::warn;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable key-value store over a migrated SQLite connection.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Constructs a store from a connection returned by `open_db*`.
    ///
    /// # Errors
    /// - `DbError::MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        if !table_exists(conn, "kv_entries")? {
            return Err(DbError::MissingRequiredTable("kv_entries").into());
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let stored = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| Ok(stored_text(row.get_ref(0)?)),
            )
            .optional()?;
        match stored {
            None => Ok(None),
            Some(Ok(text)) => Ok(Some(text)),
            Some(Err(reason)) => {
                warn!("event=kv_get module=storage status=fallback key={key} reason={reason}");
                Ok(None)
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

fn stored_text(value: ValueRef<'_>) -> Result<String, &'static str> {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8(bytes.to_vec()).map_err(|_| "invalid_utf8")
        }
        ValueRef::Null => Err("null_value"),
        ValueRef::Integer(_) | ValueRef::Real(_) => Err("non_text_value"),
    }
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::db::{open_db_in_memory, DbError};
    use crate::storage::{KeyValueStore, StorageError};
    use rusqlite::Connection;

    #[test]
    fn upsert_overwrites_and_reads_back() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SqliteKvStore::try_new(&conn).unwrap();
        assert_eq!(store.get("NOTES").unwrap(), None);

        store.set("NOTES", "[]").unwrap();
        store.set("NOTES", "[1]").unwrap();
        assert_eq!(store.get("NOTES").unwrap().as_deref(), Some("[1]"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn non_text_values_read_as_absent() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES ('NOTES', X'FFFE00', 0);
             INSERT INTO kv_entries (key, value, updated_at) VALUES ('TAGS', 42, 0);",
        )
        .unwrap();
        let store = SqliteKvStore::try_new(&conn).unwrap();
        assert_eq!(store.get("NOTES").unwrap(), None);
        assert_eq!(store.get("TAGS").unwrap(), None);
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKvStore::try_new(&conn).err().expect("must reject");
        assert!(matches!(
            err,
            StorageError::Db(DbError::MissingRequiredTable("kv_entries"))
        ));
    }
}
