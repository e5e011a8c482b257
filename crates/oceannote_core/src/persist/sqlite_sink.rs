//! SQLite-backed blob sink.
//!
//! # Responsibility
//! - Store one blob per storage key in the `blobs` table.
//!
//! # Invariants
//! - Writes are single-statement upserts; a key never has two rows.
//! - Construction fails fast when the `blobs` table is missing.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::persist::sink::{BlobSink, SinkResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Blob sink over a migrated SQLite connection.
pub struct SqliteBlobSink {
    conn: Connection,
    key: String,
}

impl SqliteBlobSink {
    /// Wraps an already-migrated connection.
    pub fn try_new(conn: Connection, key: impl Into<String>) -> SinkResult<Self> {
        ensure_blob_table(&conn)?;
        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> SinkResult<Self> {
        Self::try_new(open_db(path)?, key)
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory(key: impl Into<String>) -> SinkResult<Self> {
        Self::try_new(open_db_in_memory()?, key)
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl BlobSink for SqliteBlobSink {
    fn read(&self) -> SinkResult<Option<String>> {
        let blob = self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn write(&self, blob: &str) -> SinkResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), blob],
        )?;
        Ok(())
    }
}

fn ensure_blob_table(conn: &Connection) -> SinkResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'blobs'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(DbError::MissingTable("blobs").into())
    }
}
