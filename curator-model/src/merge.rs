//! Field-level merge rules shared by every item shape.
//!
//! A shape implements [`Mergeable`] by walking its own fields and handing
//! each one to the matching [`MergeContext`] helper. The helpers own the
//! lock, replace, and collection rules so shapes never restate them.

use crate::policy::{CollectionPolicy, LockedFields, MergePolicy};
use curator_types::{MetadataField, Shape};
use std::collections::BTreeMap;

/// A record shape that knows how to merge provider data into itself.
pub trait Mergeable: Shape + Clone + PartialEq + Send + Sync {
    /// Type key of `MetadataResult<Self>`.
    const RESULT_TYPE_KEY: &'static str;

    /// Merges every field of `source` into `target` under `ctx`.
    ///
    /// Must not touch fields locked in `ctx` and must be idempotent for an
    /// unchanged source.
    fn merge_fields(source: &Self, target: &mut Self, ctx: &MergeContext<'_>);

    /// Fields the record itself pins, added to the caller's locks on refresh.
    fn locked_fields(&self) -> LockedFields {
        LockedFields::new()
    }

    /// The whole record is exempt from automatic refresh.
    fn is_item_locked(&self) -> bool {
        false
    }
}

/// Locks and policy for a single merge call.
#[derive(Debug, Clone, Copy)]
pub struct MergeContext<'a> {
    locked: &'a LockedFields,
    policy: MergePolicy,
}

impl<'a> MergeContext<'a> {
    #[must_use]
    pub fn new(locked: &'a LockedFields, policy: MergePolicy) -> Self {
        Self { locked, policy }
    }

    #[must_use]
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    #[must_use]
    pub fn locked_fields(&self) -> &LockedFields {
        self.locked
    }

    /// True if `field` is set and locked.
    #[must_use]
    pub fn is_locked(&self, field: Option<MetadataField>) -> bool {
        field.is_some_and(|f| self.locked.contains(f))
    }

    /// Merges an optional scalar. `None` in the source is a no-op.
    pub fn value<V: Clone>(
        &self,
        field: Option<MetadataField>,
        source: &Option<V>,
        target: &mut Option<V>,
    ) {
        if self.is_locked(field) {
            return;
        }
        if let Some(value) = source {
            if self.policy.replace_data || target.is_none() {
                *target = Some(value.clone());
            }
        }
    }

    /// Merges optional text. Blank strings count as absent on both sides.
    pub fn text(
        &self,
        field: Option<MetadataField>,
        source: &Option<String>,
        target: &mut Option<String>,
    ) {
        if self.is_locked(field) || is_blank(source) {
            return;
        }
        if self.policy.replace_data || is_blank(target) {
            target.clone_from(source);
        }
    }

    /// Merges a collection.
    ///
    /// Replace takes the source wholesale when it has entries; otherwise the
    /// configured [`CollectionPolicy`] applies.
    pub fn list<V: Clone + PartialEq>(
        &self,
        field: Option<MetadataField>,
        source: &[V],
        target: &mut Vec<V>,
    ) {
        if self.is_locked(field) || source.is_empty() {
            return;
        }
        if self.policy.replace_data {
            if target.as_slice() != source {
                *target = source.to_vec();
            }
            return;
        }
        match self.policy.collections {
            CollectionPolicy::Union => {
                for value in source {
                    if !target.contains(value) {
                        target.push(value.clone());
                    }
                }
            }
            CollectionPolicy::FillIfEmpty => {
                if target.is_empty() {
                    *target = source.to_vec();
                }
            }
        }
    }

    /// Merges a keyed map entry by entry. Blank values are ignored.
    pub fn map(&self, source: &BTreeMap<String, String>, target: &mut BTreeMap<String, String>) {
        for (key, value) in source {
            if value.trim().is_empty() {
                continue;
            }
            if self.policy.replace_data || !target.contains_key(key) {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    /// Merges a flag whose default is `false`. A `false` source is absent.
    pub fn flag(&self, source: bool, target: &mut bool) {
        if source {
            *target = true;
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}
