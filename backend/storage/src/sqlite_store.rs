/// SQLite-backed durable file record store.
///
/// Uses `rusqlite` to persist `StoredFile` rows in a `files` table. A single
/// connection is held behind a `tokio::sync::Mutex`; the bot's traffic is
/// light enough that one writer is plenty, and WAL keeps reads cheap.
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info};

use droplink_core::{DropError, MediaKind, StoredFile};

use crate::store::FileStore;

pub struct SqliteFileStore {
    conn: Mutex<Connection>,
}

impl SqliteFileStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite file database")?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS files (
                 id           TEXT PRIMARY KEY,
                 file_ref     TEXT NOT NULL,
                 display_name TEXT NOT NULL,
                 kind         TEXT NOT NULL,
                 created_at   TEXT NOT NULL
             );",
        )
        .context("Failed to initialize files schema")?;

        info!("SqliteFileStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory SQLite")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS files (
                 id           TEXT PRIMARY KEY,
                 file_ref     TEXT NOT NULL,
                 display_name TEXT NOT NULL,
                 kind         TEXT NOT NULL,
                 created_at   TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[async_trait]
impl FileStore for SqliteFileStore {
    async fn insert(&self, file: &StoredFile) -> Result<()> {
        let conn = self.conn.lock().await;
        let result = conn.execute(
            "INSERT INTO files (id, file_ref, display_name, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                file.id,
                file.file_ref,
                file.display_name,
                file.kind.as_str(),
                file.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                debug!(id = %file.id, kind = %file.kind, "Inserted file record");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(DropError::DuplicateId(file.id.clone()).into())
            }
            Err(e) => Err(e).context("Failed to insert file record"),
        }
    }

    async fn find(&self, id: &str) -> Result<Option<StoredFile>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, file_ref, display_name, kind, created_at
             FROM files WHERE id = ?1",
            params![id],
            row_to_file,
        )
        .optional()
        .context("Failed to query file record")
    }
}

fn row_to_file(row: &rusqlite::Row) -> rusqlite::Result<StoredFile> {
    let created_at_raw: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?;
    let kind_tag: String = row.get(3)?;

    Ok(StoredFile {
        id: row.get(0)?,
        file_ref: row.get(1)?,
        display_name: row.get(2)?,
        kind: MediaKind::parse(&kind_tag),
        created_at,
    })
}
