//! Codec cache and record serializer for Curator.
//!
//! Turns merged records into durable bytes and back:
//!
//! - [`Codec`]: a reusable encoder/decoder for one record shape
//! - [`Format`]: builds codecs; [`JsonFormat`] is the shipped format
//! - [`CodecCache`]: builds at most one codec per [`curator_types::TypeKey`],
//!   safe under concurrent first use
//! - [`Serializer`]: stream, buffer, and file entry points, with atomic
//!   file replacement
//!
//! Codec construction is assumed expensive, so codecs are built lazily and
//! kept for the lifetime of the cache.

mod cache;
mod codec;
mod error;
mod fs;
mod json;
mod serializer;

pub use cache::CodecCache;
pub use codec::{Codec, Format, Record};
pub use error::{CodecError, CodecResult};
pub use fs::{FileSystem, LocalFileSystem, PendingWrite};
pub use json::{FORMAT_VERSION, JsonCodec, JsonFormat};
pub use serializer::Serializer;
