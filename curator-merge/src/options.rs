//! Refresh configuration.

use curator_codec::{CodecError, CodecResult, Format, Serializer};
use curator_model::{CollectionPolicy, LockedFields, MergePolicy};
use curator_types::Shape;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// User preferences applied to every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshOptions {
    /// Overwrite existing metadata instead of only filling gaps.
    pub replace_all_metadata: bool,
    /// Merge item bookkeeping along with metadata.
    pub merge_metadata_settings: bool,
    pub collection_policy: CollectionPolicy,
    /// Fields locked on every item, on top of each item's own locks.
    pub locked_fields: LockedFields,
}

impl Shape for RefreshOptions {
    const TYPE_KEY: &'static str = "curator.merge.RefreshOptions";
}

impl RefreshOptions {
    /// The merge policy these options describe.
    #[must_use]
    pub fn policy(&self) -> MergePolicy {
        MergePolicy {
            replace_data: self.replace_all_metadata,
            merge_metadata_settings: self.merge_metadata_settings,
            collections: self.collection_policy,
        }
    }

    /// Loads options from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load<F: Format>(serializer: &Serializer<F>, path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        match serializer.decode_from_file(path) {
            Err(CodecError::Resource { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no refresh options file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save<F: Format>(&self, serializer: &Serializer<F>, path: impl AsRef<Path>) -> CodecResult<()> {
        serializer.encode_to_file(self, path)
    }
}
