//! Library item model for Curator.
//!
//! Defines the record shapes the merge engine works on and the rules it
//! merges them by:
//! - [`BaseItem`] and the concrete shapes built on it ([`LiveTvProgram`], [`Movie`])
//! - [`MetadataResult`]: a provider's candidate for one item, plus credits
//! - [`Mergeable`]: per-shape field walk, driven by a [`MergeContext`]
//! - [`LockedFields`], [`MergePolicy`], [`CollectionPolicy`]: what a merge may touch
//!
//! Every shape implements [`curator_types::Shape`], so the same types flow
//! through the codec cache unchanged.

mod item;
mod merge;
mod movie;
mod person;
mod policy;
mod program;
mod result;

pub use item::{BaseItem, ItemSettings};
pub use merge::{MergeContext, Mergeable};
pub use movie::Movie;
pub use person::{Person, PersonKind};
pub use policy::{CollectionPolicy, LockedFields, MergePolicy};
pub use program::LiveTvProgram;
pub use result::MetadataResult;
