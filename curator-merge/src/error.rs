//! Error types for the merge layer.

use curator_codec::CodecError;
use curator_types::TypeKey;
use thiserror::Error;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur while merging or refreshing items.
#[derive(Debug, Error)]
pub enum MergeError {
    /// No merge strategy is registered for the shape.
    #[error("unsupported shape: {0}")]
    UnsupportedShape(TypeKey),

    /// Source or target is not the registered shape. A caller bug, never
    /// retried.
    #[error("schema mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: TypeKey, actual: String },

    /// Encoding or decoding a record failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Provider repository error.
    #[error("repository error: {0}")]
    Repository(String),

    /// Serialization of repository bookkeeping failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
