//! Metadata merge engine for Curator.
//!
//! Merges candidate metadata from several providers into one authoritative
//! record per library item, honoring field locks and replace policy, and
//! keeps each provider's last result in a [`ProviderRepository`].
//!
//! # Architecture
//!
//! - [`MergeEngine`]: generic driver; field rules live in each shape's
//!   [`curator_model::Mergeable`] impl
//! - [`MergeRegistry`]: type-erased dispatch by [`curator_types::TypeKey`]
//! - [`MetadataService`]: refresh flow: combine candidates, merge, record
//! - [`SqliteProviderRepository`] / [`MemoryProviderRepository`]
//!
//! Merging never performs I/O; persistence is an explicit step through the
//! codec cache.

mod engine;
mod error;
mod options;
mod registry;
pub mod repository;
mod service;

pub use engine::{MergeEngine, MergeFn, merge_results};
pub use error::{MergeError, MergeResult};
pub use options::RefreshOptions;
pub use registry::{ErasedMerge, MergeRegistry};
pub use repository::{
    MemoryProviderRepository, MetadataStatus, ProviderRepository, SqliteProviderRepository,
};
pub use service::{ItemUpdate, MetadataService, RefreshJob};
