//! Record serializer: the persistence entry point over the codec cache.

use crate::cache::CodecCache;
use crate::codec::{Format, Record};
use crate::error::{CodecError, CodecResult};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::json::JsonFormat;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Encodes and decodes records through a shared [`CodecCache`].
///
/// Safe to share between threads; every operation takes `&self`.
pub struct Serializer<F: Format = JsonFormat> {
    cache: CodecCache<F>,
    fs: Arc<dyn FileSystem>,
}

impl Default for Serializer<JsonFormat> {
    fn default() -> Self {
        Self::new(JsonFormat::default())
    }
}

impl Serializer<JsonFormat> {
    /// Process-wide serializer using indented JSON on the local disk.
    pub fn global() -> &'static Serializer<JsonFormat> {
        static GLOBAL: OnceLock<Serializer<JsonFormat>> = OnceLock::new();
        GLOBAL.get_or_init(Serializer::default)
    }
}

impl<F: Format> Serializer<F> {
    /// Creates a serializer for `format` on the local disk.
    pub fn new(format: F) -> Self {
        Self::with_file_system(format, Arc::new(LocalFileSystem))
    }

    /// Creates a serializer reading and writing files through `fs`.
    pub fn with_file_system(format: F, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            cache: CodecCache::new(format),
            fs,
        }
    }

    /// Returns the underlying codec cache.
    pub fn cache(&self) -> &CodecCache<F> {
        &self.cache
    }

    /// Encodes `value` into `stream`.
    pub fn encode_to_stream<T: Record, W: Write>(&self, value: &T, stream: &mut W) -> CodecResult<()> {
        let codec = self.cache.codec::<T>()?;
        codec.encode(value, stream)
    }

    /// Decodes one `T` from `stream`.
    pub fn decode_from_stream<T: Record, R: Read>(&self, stream: &mut R) -> CodecResult<T> {
        let codec = self.cache.codec::<T>()?;
        codec.decode(stream)
    }

    /// Encodes `value` into a new buffer.
    pub fn encode_to_vec<T: Record>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode_to_stream(value, &mut buffer)?;
        Ok(buffer)
    }

    /// Decodes one `T` from an in-memory buffer.
    pub fn decode_from_bytes<T: Record>(&self, buffer: &[u8]) -> CodecResult<T> {
        let mut reader = buffer;
        self.decode_from_stream(&mut reader)
    }

    /// Encodes `value` to `path`.
    ///
    /// The file at `path` is replaced only after the full record was written;
    /// on any failure the previous contents (or absence) stay in place.
    pub fn encode_to_file<T: Record>(&self, value: &T, path: impl AsRef<Path>) -> CodecResult<()> {
        let path = path.as_ref();
        let mut pending = self
            .fs
            .create_pending(path)
            .map_err(|e| CodecError::resource(path, e))?;

        if let Err(e) = self.encode_to_stream(value, &mut pending) {
            warn!(path = %path.display(), error = %e, "encode failed, discarding partial write");
            return Err(e);
        }

        pending.commit().map_err(|e| CodecError::resource(path, e))?;
        debug!(path = %path.display(), type_key = T::TYPE_KEY, "record written");
        Ok(())
    }

    /// Decodes one `T` from the file at `path`.
    pub fn decode_from_file<T: Record>(&self, path: impl AsRef<Path>) -> CodecResult<T> {
        let path = path.as_ref();
        let mut reader = self
            .fs
            .open_read(path)
            .map_err(|e| CodecError::resource(path, e))?;

        self.decode_from_stream(&mut reader).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to decode record");
        })
    }
}
