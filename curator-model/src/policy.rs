use curator_types::MetadataField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fields a merge must never modify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockedFields(BTreeSet<MetadataField>);

impl LockedFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lockable field.
    #[must_use]
    pub fn all() -> Self {
        MetadataField::ALL.into_iter().collect()
    }

    #[must_use]
    pub fn contains(&self, field: MetadataField) -> bool {
        self.0.contains(&field)
    }

    /// Adds a field. Returns false if it was already locked.
    pub fn insert(&mut self, field: MetadataField) -> bool {
        self.0.insert(field)
    }

    pub fn remove(&mut self, field: MetadataField) -> bool {
        self.0.remove(&field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MetadataField> + '_ {
        self.0.iter().copied()
    }

    /// Returns the fields locked in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.0.union(&other.0).copied().collect()
    }
}

impl FromIterator<MetadataField> for LockedFields {
    fn from_iter<I: IntoIterator<Item = MetadataField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a MetadataField> for LockedFields {
    fn from_iter<I: IntoIterator<Item = &'a MetadataField>>(iter: I) -> Self {
        Self(iter.into_iter().copied().collect())
    }
}

/// How collection-valued fields merge when existing data is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionPolicy {
    /// Append source entries the target does not already have.
    #[default]
    Union,
    /// Take the source collection only when the target's is empty.
    FillIfEmpty,
}

/// Replace and settings flags for one merge call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    /// Overwrite existing unlocked values instead of only filling gaps.
    pub replace_data: bool,
    /// Also merge item bookkeeping (locks, preferred language, dates).
    pub merge_metadata_settings: bool,
    /// Rule for collections when `replace_data` is false.
    #[serde(default)]
    pub collections: CollectionPolicy,
}

impl MergePolicy {
    /// Only fill fields the target is missing.
    #[must_use]
    pub const fn fill() -> Self {
        Self {
            replace_data: false,
            merge_metadata_settings: false,
            collections: CollectionPolicy::Union,
        }
    }

    /// Overwrite unlocked fields with whatever the source has.
    #[must_use]
    pub const fn replace() -> Self {
        Self {
            replace_data: true,
            merge_metadata_settings: false,
            collections: CollectionPolicy::Union,
        }
    }

    #[must_use]
    pub const fn with_metadata_settings(mut self, merge: bool) -> Self {
        self.merge_metadata_settings = merge;
        self
    }

    #[must_use]
    pub const fn with_collections(mut self, collections: CollectionPolicy) -> Self {
        self.collections = collections;
        self
    }
}
