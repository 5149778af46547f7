//! Durable backend database: connection setup and schema upgrades.
//!
//! Only `SqliteKvStore` touches these connections. The schema is a single
//! `kv_entries` table; note and tag payloads live inside its values and are
//! never migrated here.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening, upgrading or querying the backend database.
#[derive(Debug)]
pub enum DbError {
    /// Error reported by SQLite itself.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; refusing to downgrade it.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was not produced by `open_db*` (table missing).
    MissingRequiredTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "kv database is at schema v{db_version}, this build supports up to v{latest_supported}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "kv database is missing table `{table}`; open it with open_db")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use std::error::Error;

    #[test]
    fn only_sqlite_errors_carry_a_source() {
        let sqlite = DbError::from(rusqlite::Error::InvalidQuery);
        assert!(sqlite.source().is_some());
        assert!(sqlite.to_string().starts_with("sqlite: "));

        let newer = DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        };
        assert!(newer.source().is_none());
        assert!(newer.to_string().contains("v9"));
    }
}
