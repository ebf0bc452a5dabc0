//! Generic merge driver.
//!
//! The engine knows nothing about fields. It threads locks and policy into
//! a per-shape strategy, which defaults to the shape's [`Mergeable`] impl.

use curator_model::{LockedFields, MergeContext, MergePolicy, Mergeable, MetadataResult};
use std::sync::Arc;
use tracing::debug;

/// A merge step for results of shape `T`.
pub type MergeFn<T> =
    dyn Fn(&MetadataResult<T>, &mut MetadataResult<T>, &MergeContext<'_>) + Send + Sync;

/// Merges candidate results into a target under locks and policy.
///
/// Holds no locks of its own; callers keep at most one merge in flight per
/// item.
pub struct MergeEngine<T> {
    strategy: Arc<MergeFn<T>>,
}

impl<T> Clone for MergeEngine<T> {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
        }
    }
}

impl<T: Mergeable> Default for MergeEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Mergeable> MergeEngine<T> {
    /// An engine using `T`'s own field walk.
    pub fn new() -> Self {
        Self::with_strategy(|source, target, ctx| target.merge_from(source, ctx))
    }

    /// An engine using a caller-supplied merge step.
    pub fn with_strategy<S>(strategy: S) -> Self
    where
        S: Fn(&MetadataResult<T>, &mut MetadataResult<T>, &MergeContext<'_>) + Send + Sync + 'static,
    {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    /// Merges `source` into `target`.
    ///
    /// Absent source fields are no-ops, locked fields are never written, and
    /// `source` is only read.
    pub fn merge(
        &self,
        source: &MetadataResult<T>,
        target: &mut MetadataResult<T>,
        locked: &LockedFields,
        policy: MergePolicy,
    ) {
        debug!(
            shape = T::TYPE_KEY,
            provider = source.provider.as_deref().unwrap_or("-"),
            replace = policy.replace_data,
            locked = locked.len(),
            "merging metadata"
        );
        let ctx = MergeContext::new(locked, policy);
        (self.strategy)(source, target, &ctx);
    }

    /// Folds `candidates` into one result, earlier candidates taking
    /// precedence over later ones.
    pub fn combine<'a, I>(&self, candidates: I, policy: MergePolicy) -> Option<MetadataResult<T>>
    where
        I: IntoIterator<Item = &'a MetadataResult<T>>,
        T: 'a,
    {
        let fill = MergePolicy {
            replace_data: false,
            ..policy
        };
        let unlocked = LockedFields::new();
        let mut combined: Option<MetadataResult<T>> = None;

        for candidate in candidates.into_iter().filter(|c| c.has_metadata) {
            match combined.as_mut() {
                None => combined = Some(candidate.clone()),
                Some(acc) => self.merge(candidate, acc, &unlocked, fill),
            }
        }
        combined
    }
}

/// Five-argument form of [`MergeEngine::merge`] using the shape's own
/// field walk.
pub fn merge_results<T: Mergeable>(
    source: &MetadataResult<T>,
    target: &mut MetadataResult<T>,
    locked: &LockedFields,
    replace_data: bool,
    merge_metadata_settings: bool,
) {
    let policy = MergePolicy {
        replace_data,
        merge_metadata_settings,
        ..MergePolicy::default()
    };
    MergeEngine::<T>::new().merge(source, target, locked, policy);
}
