//! Key/value metadata storage (`app_metadata`).
//!
//! Holds the shared budget and one-time markers (initial seed, legacy
//! completion import). Marker presence is what callers check; the stored
//! value is an informational note.

use crate::db::migrations::latest_version;
use crate::repo::item_repo::{table_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Metadata key holding the shared budget target.
pub const BUDGET_KEY: &str = "budget";
/// Marker written once the initial catalog has been inserted.
pub const SEED_MARKER_KEY: &str = "initial_seed";
/// Marker written once legacy documents have been imported.
pub const LEGACY_COMPLETION_MARKER_KEY: &str = "migration_v3_completed_quantity";

/// Repository interface for metadata values and markers.
pub trait MetadataRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_value(&self, key: &str, value: &str) -> RepoResult<()>;

    fn has_marker(&self, key: &str) -> RepoResult<bool> {
        Ok(self.get_value(key)?.is_some())
    }

    fn set_marker(&self, key: &str, note: &str) -> RepoResult<()> {
        self.set_value(key, note)
    }
}

/// SQLite-backed metadata repository.
pub struct SqliteMetadataRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMetadataRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        if !table_exists(conn, "app_metadata")? {
            return Err(RepoError::MissingRequiredTable("app_metadata"));
        }
        Ok(Self { conn })
    }
}

impl MetadataRepository for SqliteMetadataRepository<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        read_metadata(self.conn, key)
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        write_metadata(self.conn, key, value)
    }
}

pub(crate) fn read_metadata(conn: &Connection, key: &str) -> RepoResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM app_metadata WHERE key = ?1;",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

pub(crate) fn write_metadata(conn: &Connection, key: &str, value: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO app_metadata (key, value)
         VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, value],
    )?;
    Ok(())
}
