//! Core type definitions for Curator.
//!
//! This crate defines the fundamental, domain-agnostic types used throughout
//! the metadata core:
//! - Library item identifiers (UUID v7)
//! - [`TypeKey`] and the [`Shape`] trait, the identity of a record shape
//! - [`MetadataField`], the vocabulary of field locks
//!
//! Concrete item shapes (programs, movies, people) live in `curator-model`.

mod field;
mod ids;
mod shape;

pub use field::MetadataField;
pub use ids::ItemId;
pub use shape::{Shape, TypeKey};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown metadata field: {0}")]
    UnknownField(String),
}
