use crate::merge::{MergeContext, Mergeable};
use crate::person::Person;
use curator_types::{MetadataField, Shape};
use serde::{Deserialize, Serialize};

/// A candidate (or merged) record for one item, as produced by a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataResult<T> {
    pub item: T,
    #[serde(default)]
    pub people: Vec<Person>,
    /// The provider found anything at all.
    #[serde(default)]
    pub has_metadata: bool,
    /// Name of the provider that produced this result.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub result_language: Option<String>,
}

impl<T> MetadataResult<T> {
    /// A result carrying `item`, attributed to `provider`.
    pub fn from_provider(provider: impl Into<String>, item: T) -> Self {
        Self {
            item,
            people: Vec::new(),
            has_metadata: true,
            provider: Some(provider.into()),
            result_language: None,
        }
    }

    #[must_use]
    pub fn with_people(mut self, people: Vec<Person>) -> Self {
        self.people = people;
        self
    }
}

impl<T: Mergeable> MetadataResult<T> {
    /// Merges `source` into `self` under `ctx`.
    ///
    /// `source` is only read. The provider attribution of `self` is kept.
    pub fn merge_from(&mut self, source: &Self, ctx: &MergeContext<'_>) {
        T::merge_fields(&source.item, &mut self.item, ctx);
        ctx.list(Some(MetadataField::Cast), &source.people, &mut self.people);
        ctx.text(None, &source.result_language, &mut self.result_language);
        ctx.flag(source.has_metadata, &mut self.has_metadata);
    }
}

impl<T: Mergeable> Shape for MetadataResult<T> {
    const TYPE_KEY: &'static str = T::RESULT_TYPE_KEY;
}
