//! State repository contracts and SQLite implementation.
//!
//! The journal store travels as one opaque JSON payload per page key, the
//! same shape the browser original kept in localStorage. The repository
//! neither parses nor validates the payload; that belongs to the model.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence errors below the store's own corrupt-payload handling.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Load/save contract for serialized journal state.
pub trait StateRepository {
    /// Returns the payload stored under `key`, `None` when absent.
    fn load(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores `payload` under `key`, replacing any previous payload.
    fn save(&self, key: &str, payload: &str) -> RepoResult<()>;
}

impl<T: StateRepository + ?Sized> StateRepository for &T {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, payload: &str) -> RepoResult<()> {
        (**self).save(key, payload)
    }
}

/// SQLite-backed state repository over the `journal_state` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM journal_state WHERE storage_key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO journal_state (storage_key, payload)
             VALUES (?1, ?2)
             ON CONFLICT (storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }
}

/// In-memory repository for tests and hosts without local disk.
#[derive(Default)]
pub struct MemoryStateRepository {
    payloads: Mutex<HashMap<String, String>>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateRepository for MemoryStateRepository {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        let payloads = self.payloads.lock().unwrap_or_else(|e| e.into_inner());
        Ok(payloads.get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> RepoResult<()> {
        let mut payloads = self.payloads.lock().unwrap_or_else(|e| e.into_inner());
        payloads.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStateRepository, StateRepository};

    #[test]
    fn memory_repo_round_trips_and_reports_absence() {
        let repo = MemoryStateRepository::new();
        assert_eq!(repo.load("k").expect("load works"), None);

        repo.save("k", "{}").expect("save works");
        assert_eq!(repo.load("k").expect("load works").as_deref(), Some("{}"));

        repo.save("k", "[1]").expect("replace works");
        assert_eq!(repo.load("k").expect("load works").as_deref(), Some("[1]"));
    }
}
