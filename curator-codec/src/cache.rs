//! Per-shape codec cache.
//!
//! Holds one codec per [`TypeKey`] for the lifetime of the cache. Entries are
//! never evicted; the number of shapes is small and fixed.

use crate::codec::{Codec, Format, Record};
use crate::error::{CodecError, CodecResult};
use crate::json::JsonFormat;
use curator_types::TypeKey;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

type ErasedCodec = Arc<dyn Any + Send + Sync>;

/// Build outcome stored in a slot. A failed build is remembered too, so a
/// shape the format rejects is not rebuilt on every call.
type SlotValue = Result<ErasedCodec, String>;

/// Lazily initialized cache of codecs keyed by shape.
///
/// Concurrent first calls for the same shape race on a per-key [`OnceLock`],
/// so exactly one codec is built and every caller observes that one.
pub struct CodecCache<F: Format = JsonFormat> {
    format: F,
    slots: RwLock<HashMap<TypeKey, Arc<OnceLock<SlotValue>>>>,
    constructed: AtomicUsize,
}

impl Default for CodecCache<JsonFormat> {
    fn default() -> Self {
        Self::new(JsonFormat::default())
    }
}

impl<F: Format> CodecCache<F> {
    /// Creates an empty cache building codecs with `format`.
    pub fn new(format: F) -> Self {
        Self {
            format,
            slots: RwLock::new(HashMap::new()),
            constructed: AtomicUsize::new(0),
        }
    }

    /// Returns the format codecs are built with.
    pub fn format(&self) -> &F {
        &self.format
    }

    /// Returns the codec for `T`, building it on first use.
    pub fn codec<T: Record>(&self) -> CodecResult<Arc<dyn Codec<T>>> {
        let type_key = TypeKey::of::<T>();
        let slot = self.slot(&type_key);

        let value = slot.get_or_init(|| {
            self.constructed.fetch_add(1, Ordering::SeqCst);
            debug!(type_key = %type_key, format = self.format.name(), "building codec");
            self.format
                .build::<T>()
                .map(|codec| {
                    let shared: Arc<dyn Codec<T>> = Arc::from(codec);
                    Arc::new(shared) as ErasedCodec
                })
                .map_err(|e| e.to_string())
        });

        let erased = value.as_ref().map_err(|reason| CodecError::UnsupportedShape {
            type_key: type_key.clone(),
            reason: reason.clone(),
        })?;

        erased
            .downcast_ref::<Arc<dyn Codec<T>>>()
            .cloned()
            .ok_or_else(|| CodecError::UnsupportedShape {
                type_key,
                reason: "type key is already bound to a different record type".into(),
            })
    }

    /// Returns true if a codec for `type_key` has been requested.
    pub fn contains(&self, type_key: &TypeKey) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of distinct shapes cached.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of codec constructions performed so far.
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    fn slot(&self, type_key: &TypeKey) -> Arc<OnceLock<SlotValue>> {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_key)
        {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(type_key.clone()).or_default())
    }
}
