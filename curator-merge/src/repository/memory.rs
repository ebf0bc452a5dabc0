use super::{MetadataStatus, ProviderRepository};
use crate::error::MergeResult;
use curator_types::{ItemId, TypeKey};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

type ResultKey = (ItemId, String, TypeKey);

/// In-process repository, for tests and embedding without a database.
#[derive(Debug, Default)]
pub struct MemoryProviderRepository {
    results: Mutex<HashMap<ResultKey, Vec<u8>>>,
    statuses: Mutex<HashMap<ItemId, MetadataStatus>>,
}

impl MemoryProviderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored provider results.
    pub fn result_count(&self) -> usize {
        self.results.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl ProviderRepository for MemoryProviderRepository {
    fn save_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
        payload: &[u8],
    ) -> MergeResult<()> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((item_id, provider.to_string(), type_key.clone()), payload.to_vec());
        Ok(())
    }

    fn load_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
    ) -> MergeResult<Option<Vec<u8>>> {
        let key = (item_id, provider.to_string(), type_key.clone());
        Ok(self
            .results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned())
    }

    fn delete_results(&self, item_id: ItemId) -> MergeResult<usize> {
        let mut results = self.results.lock().unwrap_or_else(PoisonError::into_inner);
        let before = results.len();
        results.retain(|(id, _, _), _| *id != item_id);
        Ok(before - results.len())
    }

    fn save_status(&self, status: &MetadataStatus) -> MergeResult<()> {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(status.item_id, status.clone());
        Ok(())
    }

    fn get_status(&self, item_id: ItemId) -> MergeResult<Option<MetadataStatus>> {
        Ok(self
            .statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&item_id)
            .cloned())
    }
}
