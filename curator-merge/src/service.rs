//! Refresh driver: combines provider candidates, merges them into the
//! authoritative record, and keeps the provider repository current.

use crate::engine::MergeEngine;
use crate::error::{MergeError, MergeResult};
use crate::options::RefreshOptions;
use crate::repository::{MetadataStatus, ProviderRepository};
use curator_codec::{Format, JsonFormat, Record, Serializer};
use curator_model::{LockedFields, Mergeable, MetadataResult};
use curator_types::{ItemId, TypeKey};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a refresh did to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub item_id: ItemId,
    /// The target differs from what it was before the refresh.
    pub changed: bool,
    /// Providers that contributed data, in priority order.
    pub applied_providers: Vec<String>,
}

/// One item's refresh input for [`MetadataService::refresh_many`].
pub struct RefreshJob<'a, T> {
    pub item_id: ItemId,
    pub target: &'a mut MetadataResult<T>,
    /// Candidates in provider priority order, highest first.
    pub candidates: Vec<MetadataResult<T>>,
}

/// Refreshes items of shape `T`.
pub struct MetadataService<T, F: Format = JsonFormat> {
    engine: MergeEngine<T>,
    repository: Arc<dyn ProviderRepository>,
    serializer: Arc<Serializer<F>>,
    options: RefreshOptions,
}

impl<T> MetadataService<T, JsonFormat>
where
    T: Mergeable,
    MetadataResult<T>: Record,
{
    /// A service using `T`'s own field walk and a compact JSON serializer
    /// for repository payloads.
    pub fn new(repository: Arc<dyn ProviderRepository>, options: RefreshOptions) -> Self {
        Self::with_engine(
            MergeEngine::new(),
            repository,
            Arc::new(Serializer::new(JsonFormat::compact())),
            options,
        )
    }
}

impl<T, F> MetadataService<T, F>
where
    T: Mergeable,
    MetadataResult<T>: Record,
    F: Format,
{
    pub fn with_engine(
        engine: MergeEngine<T>,
        repository: Arc<dyn ProviderRepository>,
        serializer: Arc<Serializer<F>>,
        options: RefreshOptions,
    ) -> Self {
        Self {
            engine,
            repository,
            serializer,
            options,
        }
    }

    pub fn options(&self) -> &RefreshOptions {
        &self.options
    }

    pub fn serializer(&self) -> &Serializer<F> {
        &self.serializer
    }

    /// Locks for `target`: the configured defaults plus the record's own.
    pub fn effective_locks(&self, target: &MetadataResult<T>) -> LockedFields {
        self.options.locked_fields.union(&target.item.locked_fields())
    }

    /// Merges `candidates` (highest priority first) into `target`.
    ///
    /// Each provider's candidate is recorded in the repository before the
    /// merge; the item's refresh status is recorded after it. A target whose
    /// item is locked is left exactly as it is.
    pub fn refresh(
        &self,
        item_id: ItemId,
        target: &mut MetadataResult<T>,
        candidates: &[MetadataResult<T>],
    ) -> MergeResult<ItemUpdate> {
        for candidate in candidates {
            if let Some(provider) = candidate.provider.as_deref() {
                self.save_candidate(item_id, provider, candidate)?;
            }
        }

        let update = self.apply(item_id, target, candidates);
        self.repository.save_status(&MetadataStatus::success(
            item_id,
            update.applied_providers.clone(),
        ))?;
        Ok(update)
    }

    /// Re-merges the stored results of `providers` (highest priority first)
    /// into `target`.
    ///
    /// A stored result that fails to decode is skipped and noted in the
    /// item's status; the remaining providers still apply.
    pub fn refresh_from_repository(
        &self,
        item_id: ItemId,
        target: &mut MetadataResult<T>,
        providers: &[&str],
    ) -> MergeResult<ItemUpdate> {
        let type_key = TypeKey::new(T::RESULT_TYPE_KEY);
        let mut candidates = Vec::with_capacity(providers.len());
        let mut failures = Vec::new();

        for provider in providers {
            let Some(payload) = self.repository.load_result(item_id, provider, &type_key)? else {
                debug!(item = %item_id, provider, "no stored result");
                continue;
            };
            match self.serializer.decode_from_bytes::<MetadataResult<T>>(&payload) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    warn!(item = %item_id, provider, error = %e, "skipping unreadable provider result");
                    failures.push(format!("{provider}: {e}"));
                }
            }
        }

        let update = self.apply(item_id, target, &candidates);
        let mut status = MetadataStatus::success(item_id, update.applied_providers.clone());
        if !failures.is_empty() {
            status.last_error = Some(failures.join("; "));
        }
        self.repository.save_status(&status)?;
        Ok(update)
    }

    /// Refreshes each job independently.
    ///
    /// A failing item is logged and reported in its slot; it never stops the
    /// remaining items.
    pub fn refresh_many<'a, I>(&self, jobs: I) -> Vec<(ItemId, MergeResult<ItemUpdate>)>
    where
        I: IntoIterator<Item = RefreshJob<'a, T>>,
        T: 'a,
    {
        let mut outcomes = Vec::new();
        for job in jobs {
            let result = self.refresh(job.item_id, job.target, &job.candidates);
            if let Err(e) = &result {
                warn!(item = %job.item_id, error = %e, "refresh failed");
                if let Err(status_err) = self
                    .repository
                    .save_status(&MetadataStatus::failure(job.item_id, e.to_string()))
                {
                    warn!(item = %job.item_id, error = %status_err, "failed to record refresh failure");
                }
            }
            outcomes.push((job.item_id, result));
        }

        let failed = outcomes.iter().filter(|(_, r)| r.is_err()).count();
        info!(total = outcomes.len(), failed, "refresh batch finished");
        outcomes
    }

    /// Returns the last recorded refresh status of `item_id`.
    pub fn status(&self, item_id: ItemId) -> MergeResult<Option<MetadataStatus>> {
        self.repository.get_status(item_id)
    }

    /// Writes the merged record to `path` through `serializer`.
    pub fn persist<G: Format>(
        &self,
        serializer: &Serializer<G>,
        target: &MetadataResult<T>,
        path: impl AsRef<Path>,
    ) -> MergeResult<()> {
        serializer.encode_to_file(target, path).map_err(MergeError::from)
    }

    /// Reads a record previously written by [`Self::persist`].
    pub fn load<G: Format>(
        &self,
        serializer: &Serializer<G>,
        path: impl AsRef<Path>,
    ) -> MergeResult<MetadataResult<T>> {
        serializer.decode_from_file(path).map_err(MergeError::from)
    }

    fn save_candidate(
        &self,
        item_id: ItemId,
        provider: &str,
        candidate: &MetadataResult<T>,
    ) -> MergeResult<()> {
        let payload = self.serializer.encode_to_vec(candidate)?;
        self.repository.save_result(
            item_id,
            provider,
            &TypeKey::new(T::RESULT_TYPE_KEY),
            &payload,
        )
    }

    fn apply(
        &self,
        item_id: ItemId,
        target: &mut MetadataResult<T>,
        candidates: &[MetadataResult<T>],
    ) -> ItemUpdate {
        if target.item.is_item_locked() {
            debug!(item = %item_id, "item is locked, skipping merge");
            return ItemUpdate {
                item_id,
                changed: false,
                applied_providers: Vec::new(),
            };
        }

        let policy = self.options.policy();
        let applied_providers: Vec<String> = candidates
            .iter()
            .filter(|c| c.has_metadata)
            .filter_map(|c| c.provider.clone())
            .collect();

        let Some(combined) = self.engine.combine(candidates, policy) else {
            debug!(item = %item_id, "no provider returned metadata");
            return ItemUpdate {
                item_id,
                changed: false,
                applied_providers,
            };
        };

        let locked = self.effective_locks(target);
        let before = target.clone();
        self.engine.merge(&combined, target, &locked, policy);
        let changed = *target != before;

        debug!(item = %item_id, changed, providers = applied_providers.len(), "refresh merged");
        ItemUpdate {
            item_id,
            changed,
            applied_providers,
        }
    }
}
