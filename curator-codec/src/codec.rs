//! The codec contract and the format that builds codecs.

use crate::error::CodecResult;
use curator_types::{Shape, TypeKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// A record that can be persisted through the codec cache.
pub trait Record: Shape + Serialize + DeserializeOwned + Send + Sync {}

impl<T> Record for T where T: Shape + Serialize + DeserializeOwned + Send + Sync {}

/// A reusable encoder/decoder for one record shape.
///
/// Codecs are built once per [`TypeKey`] and then shared between threads,
/// so encode and decode only take `&self`.
pub trait Codec<T>: Send + Sync {
    /// The shape this codec was built for.
    fn type_key(&self) -> &TypeKey;

    /// Writes the encoded representation of `value` to `writer`.
    fn encode(&self, value: &T, writer: &mut dyn Write) -> CodecResult<()>;

    /// Reads one value from `reader`.
    fn decode(&self, reader: &mut dyn Read) -> CodecResult<T>;
}

/// A wire format able to build a codec for any [`Record`].
///
/// Building may be expensive; [`crate::CodecCache`] guarantees it happens at
/// most once per shape.
pub trait Format: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Builds a codec for `T`.
    fn build<T: Record>(&self) -> CodecResult<Box<dyn Codec<T>>>;
}
