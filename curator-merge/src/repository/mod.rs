//! Durable per-provider results and refresh bookkeeping.
//!
//! The repository stores opaque encoded payloads; the refresh service owns
//! encoding them through the codec cache.

mod memory;
mod sqlite;

pub use memory::MemoryProviderRepository;
pub use sqlite::SqliteProviderRepository;

use crate::error::MergeResult;
use chrono::{DateTime, Utc};
use curator_types::{ItemId, TypeKey};
use serde::{Deserialize, Serialize};

/// Outcome of the last refresh of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataStatus {
    pub item_id: ItemId,
    pub last_refreshed: DateTime<Utc>,
    /// Providers whose data was applied, in priority order.
    pub providers: Vec<String>,
    pub last_error: Option<String>,
}

impl MetadataStatus {
    pub fn success(item_id: ItemId, providers: Vec<String>) -> Self {
        Self {
            item_id,
            last_refreshed: Utc::now(),
            providers,
            last_error: None,
        }
    }

    pub fn failure(item_id: ItemId, error: impl Into<String>) -> Self {
        Self {
            item_id,
            last_refreshed: Utc::now(),
            providers: Vec::new(),
            last_error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.last_error.is_none()
    }
}

/// Reads and writes each provider's last-known result per item.
pub trait ProviderRepository: Send + Sync {
    /// Stores `payload` as `provider`'s latest result for `item_id`.
    fn save_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
        payload: &[u8],
    ) -> MergeResult<()>;

    /// Returns `provider`'s latest result for `item_id`, if stored.
    fn load_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
    ) -> MergeResult<Option<Vec<u8>>>;

    /// Removes every stored result for `item_id`. Returns how many were removed.
    fn delete_results(&self, item_id: ItemId) -> MergeResult<usize>;

    fn save_status(&self, status: &MetadataStatus) -> MergeResult<()>;

    fn get_status(&self, item_id: ItemId) -> MergeResult<Option<MetadataStatus>>;
}
