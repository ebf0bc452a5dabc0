//! SQLite-backed provider repository.

use super::{MetadataStatus, ProviderRepository};
use crate::error::{MergeError, MergeResult};
use chrono::{DateTime, Utc};
use curator_types::{ItemId, TypeKey};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Persistent provider repository backed by SQLite.
#[derive(Clone)]
pub struct SqliteProviderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProviderRepository {
    /// Opens (or creates) a repository at the given path.
    pub fn open(path: impl AsRef<Path>) -> MergeResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            MergeError::Repository(format!(
                "failed to open provider repository at {}: {e}",
                path.display()
            ))
        })?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory repository (for testing).
    pub fn open_in_memory() -> MergeResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            MergeError::Repository(format!("failed to open in-memory provider repository: {e}"))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> MergeResult<Self> {
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(&self) -> MergeResult<()> {
        self.conn()
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS provider_results (
                    item_id TEXT NOT NULL,
                    provider TEXT NOT NULL,
                    type_key TEXT NOT NULL,
                    payload BLOB NOT NULL,
                    updated_at TEXT NOT NULL,
                    UNIQUE(item_id, provider, type_key)
                );

                CREATE TABLE IF NOT EXISTS metadata_status (
                    item_id TEXT PRIMARY KEY,
                    last_refreshed TEXT NOT NULL,
                    providers TEXT NOT NULL,
                    last_error TEXT
                );
                ",
            )
            .map_err(|e| MergeError::Repository(format!("failed to init repository schema: {e}")))?;
        Ok(())
    }
}

impl ProviderRepository for SqliteProviderRepository {
    fn save_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
        payload: &[u8],
    ) -> MergeResult<()> {
        self.conn()
            .execute(
                "INSERT INTO provider_results (item_id, provider, type_key, payload, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(item_id, provider, type_key)
                 DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
                params![
                    item_id.to_string(),
                    provider,
                    type_key.as_str(),
                    payload,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| MergeError::Repository(format!("failed to save provider result: {e}")))?;
        debug!(item = %item_id, provider, bytes = payload.len(), "stored provider result");
        Ok(())
    }

    fn load_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
    ) -> MergeResult<Option<Vec<u8>>> {
        self.conn()
            .query_row(
                "SELECT payload FROM provider_results
                 WHERE item_id = ?1 AND provider = ?2 AND type_key = ?3",
                params![item_id.to_string(), provider, type_key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| MergeError::Repository(format!("failed to load provider result: {e}")))
    }

    fn delete_results(&self, item_id: ItemId) -> MergeResult<usize> {
        self.conn()
            .execute(
                "DELETE FROM provider_results WHERE item_id = ?1",
                params![item_id.to_string()],
            )
            .map_err(|e| MergeError::Repository(format!("failed to delete provider results: {e}")))
    }

    fn save_status(&self, status: &MetadataStatus) -> MergeResult<()> {
        let providers = serde_json::to_string(&status.providers)?;
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO metadata_status (item_id, last_refreshed, providers, last_error)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    status.item_id.to_string(),
                    status.last_refreshed.to_rfc3339(),
                    providers,
                    status.last_error,
                ],
            )
            .map_err(|e| MergeError::Repository(format!("failed to save metadata status: {e}")))?;
        Ok(())
    }

    fn get_status(&self, item_id: ItemId) -> MergeResult<Option<MetadataStatus>> {
        let row = self
            .conn()
            .query_row(
                "SELECT last_refreshed, providers, last_error FROM metadata_status WHERE item_id = ?1",
                params![item_id.to_string()],
                |row| {
                    let last_refreshed: String = row.get(0)?;
                    let providers: String = row.get(1)?;
                    let last_error: Option<String> = row.get(2)?;
                    Ok((last_refreshed, providers, last_error))
                },
            )
            .optional()
            .map_err(|e| MergeError::Repository(format!("failed to load metadata status: {e}")))?;

        let Some((last_refreshed, providers, last_error)) = row else {
            return Ok(None);
        };

        let last_refreshed = DateTime::parse_from_rfc3339(&last_refreshed)
            .map_err(|e| MergeError::Repository(format!("invalid refresh timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(Some(MetadataStatus {
            item_id,
            last_refreshed,
            providers: serde_json::from_str(&providers)?,
            last_error,
        }))
    }
}
