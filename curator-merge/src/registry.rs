//! Type-erased merge dispatch for callers holding heterogeneous items.

use crate::engine::MergeEngine;
use crate::error::{MergeError, MergeResult};
use curator_model::{LockedFields, MergePolicy, Mergeable, MetadataResult};
use curator_types::TypeKey;
use std::any::Any;
use std::collections::HashMap;
use tracing::error;

/// A merge engine with its shape erased.
pub trait ErasedMerge: Send + Sync {
    /// Merges `source` into `target`, both expected to be the engine's
    /// `MetadataResult<T>`.
    fn merge_erased(
        &self,
        source: &dyn Any,
        target: &mut dyn Any,
        locked: &LockedFields,
        policy: MergePolicy,
    ) -> MergeResult<()>;
}

impl<T: Mergeable> ErasedMerge for MergeEngine<T> {
    fn merge_erased(
        &self,
        source: &dyn Any,
        target: &mut dyn Any,
        locked: &LockedFields,
        policy: MergePolicy,
    ) -> MergeResult<()> {
        let mismatch = |side: &str| MergeError::SchemaMismatch {
            expected: TypeKey::new(T::RESULT_TYPE_KEY),
            actual: format!("{side} is a different type"),
        };
        let source = source
            .downcast_ref::<MetadataResult<T>>()
            .ok_or_else(|| mismatch("source"))?;
        let target = target
            .downcast_mut::<MetadataResult<T>>()
            .ok_or_else(|| mismatch("target"))?;
        self.merge(source, target, locked, policy);
        Ok(())
    }
}

/// Merge engines keyed by the type key of the item shape they merge.
#[derive(Default)]
pub struct MergeRegistry {
    engines: HashMap<TypeKey, Box<dyn ErasedMerge>>,
}

impl MergeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` with its own field walk.
    pub fn register<T: Mergeable>(&mut self) -> &mut Self {
        self.register_engine(MergeEngine::<T>::new())
    }

    /// Registers a specific engine for `T`, replacing any previous one.
    pub fn register_engine<T: Mergeable>(&mut self, engine: MergeEngine<T>) -> &mut Self {
        self.engines.insert(TypeKey::of::<T>(), Box::new(engine));
        self
    }

    pub fn contains(&self, type_key: &TypeKey) -> bool {
        self.engines.contains_key(type_key)
    }

    /// Merges two `MetadataResult`s of the shape registered under `type_key`.
    pub fn merge(
        &self,
        type_key: &TypeKey,
        source: &dyn Any,
        target: &mut dyn Any,
        locked: &LockedFields,
        policy: MergePolicy,
    ) -> MergeResult<()> {
        let engine = self
            .engines
            .get(type_key)
            .ok_or_else(|| MergeError::UnsupportedShape(type_key.clone()))?;

        engine
            .merge_erased(source, target, locked, policy)
            .inspect_err(|e| error!(type_key = %type_key, error = %e, "merge called with mismatched shapes"))
    }
}
