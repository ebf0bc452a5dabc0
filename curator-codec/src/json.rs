//! JSON wire format.
//!
//! Every record is wrapped in an envelope carrying its type key, format
//! version, and a SHA-256 checksum of the payload:
//!
//! ```json
//! { "type": "curator.model.Movie", "version": 1, "checksum": "<sha256 hex>", "data": { ... } }
//! ```
//!
//! Decoding checks the envelope against the requested shape and the
//! checksum against the payload, so bytes of one shape are never silently
//! read as another and a damaged payload never decodes.

use crate::codec::{Codec, Format, Record};
use crate::error::{CodecError, CodecResult};
use curator_types::TypeKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::marker::PhantomData;

/// Current envelope version.
pub const FORMAT_VERSION: u32 = 1;

/// JSON format, indented or compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    /// Indented output, for files a user may open.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Single-line output, for blobs stored in a database.
    #[must_use]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }

    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self::pretty()
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        if self.pretty { "json-pretty" } else { "json" }
    }

    fn build<T: Record>(&self) -> CodecResult<Box<dyn Codec<T>>> {
        Ok(Box::new(JsonCodec::<T>::new(self.pretty)))
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    #[serde(rename = "type")]
    type_key: &'a str,
    version: u32,
    checksum: &'a str,
    data: &'a Value,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    type_key: String,
    version: u32,
    checksum: String,
    data: Value,
}

/// Hex SHA-256 of the compact form of `data`.
///
/// `Value` objects keep their keys sorted, so the compact form is the same
/// on encode and after a decode.
fn checksum(data: &Value) -> serde_json::Result<String> {
    let bytes = serde_json::to_vec(data)?;
    Ok(Sha256::digest(&bytes).iter().map(|b| format!("{b:02x}")).collect())
}

/// JSON codec for a single shape.
pub struct JsonCodec<T> {
    type_key: TypeKey,
    pretty: bool,
    _shape: PhantomData<fn() -> T>,
}

impl<T: Record> JsonCodec<T> {
    #[must_use]
    pub fn new(pretty: bool) -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            pretty,
            _shape: PhantomData,
        }
    }

    fn decode_error(&self, message: impl Into<String>) -> CodecError {
        CodecError::Decode {
            type_key: self.type_key.clone(),
            message: message.into(),
        }
    }
}

impl<T: Record> Codec<T> for JsonCodec<T> {
    fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    fn encode(&self, value: &T, writer: &mut dyn Write) -> CodecResult<()> {
        let encode_error = |e: serde_json::Error| CodecError::Encode {
            type_key: self.type_key.clone(),
            message: e.to_string(),
        };
        let data = serde_json::to_value(value).map_err(encode_error)?;
        let checksum = checksum(&data).map_err(encode_error)?;
        let envelope = EnvelopeRef {
            type_key: self.type_key.as_str(),
            version: FORMAT_VERSION,
            checksum: &checksum,
            data: &data,
        };
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &envelope)
        } else {
            serde_json::to_writer(&mut *writer, &envelope)
        };
        written.map_err(|e| {
            if e.is_io() {
                CodecError::Io(e.into())
            } else {
                encode_error(e)
            }
        })?;
        writer.flush()?;
        Ok(())
    }

    fn decode(&self, reader: &mut dyn Read) -> CodecResult<T> {
        let envelope: Envelope = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                CodecError::Io(e.into())
            } else {
                self.decode_error(format!("JSON decode error: {e}"))
            }
        })?;

        if envelope.type_key != self.type_key.as_str() {
            return Err(self.decode_error(format!(
                "envelope holds {}, expected {}",
                envelope.type_key, self.type_key
            )));
        }
        if envelope.version != FORMAT_VERSION {
            return Err(self.decode_error(format!(
                "unsupported envelope version {}",
                envelope.version
            )));
        }
        let actual = checksum(&envelope.data)
            .map_err(|e| self.decode_error(format!("payload checksum failed: {e}")))?;
        if actual != envelope.checksum {
            return Err(self.decode_error("payload checksum mismatch"));
        }

        serde_json::from_value(envelope.data)
            .map_err(|e| self.decode_error(format!("payload does not match shape: {e}")))
    }
}
