//! Error types for the codec layer.

use curator_types::TypeKey;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding records.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No usable codec exists for the requested shape.
    #[error("unsupported shape {type_key}: {reason}")]
    UnsupportedShape { type_key: TypeKey, reason: String },

    /// The value could not be encoded.
    #[error("failed to encode {type_key}: {message}")]
    Encode { type_key: TypeKey, message: String },

    /// The bytes are malformed or belong to a different shape.
    #[error("failed to decode {type_key}: {message}")]
    Decode { type_key: TypeKey, message: String },

    /// A file could not be opened, created, or committed.
    #[error("resource error at {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error on the underlying stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Wraps an IO error with the path it occurred on.
    pub fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }

    /// Returns true for malformed or mismatched input.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
