//! SQLite migration registry and executor.
//!
//! # Invariants
//! - Registered versions are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Ordered (version, DDL) pairs; append-only.
const SCHEMA: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Latest schema version this binary understands.
pub fn latest_version() -> u32 {
    SCHEMA.last().map_or(0, |(version, _)| *version)
}

/// Brings the connection's schema up to `latest_version`.
///
/// A database written by a newer binary is rejected rather than partially
/// interpreted.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let applied = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if applied > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: applied,
            latest_supported: latest,
        });
    }

    if applied < latest {
        let tx = conn.transaction()?;
        for (version, sql) in SCHEMA.iter().filter(|(version, _)| *version > applied) {
            tx.execute_batch(sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {version};"))?;
        }
        tx.commit()?;
    }

    Ok(())
}
