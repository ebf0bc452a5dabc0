//! Shape identity for persisted and mergeable records.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier for a data shape.
///
/// Used as the codec cache key and written into persisted envelopes, so it
/// must not change between builds. Shapes declare it explicitly through
/// [`Shape::TYPE_KEY`] rather than relying on `std::any::type_name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Creates a type key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the type key of a [`Shape`].
    #[must_use]
    pub fn of<T: Shape + ?Sized>() -> Self {
        Self(T::TYPE_KEY.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A data shape with a stable [`TypeKey`].
///
/// Implemented by every record type that is persisted through the codec
/// cache or merged through the type-erased merge registry.
pub trait Shape: 'static {
    /// Fully-qualified, build-stable name of the shape.
    const TYPE_KEY: &'static str;
}
