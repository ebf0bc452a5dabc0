use crate::item::BaseItem;
use crate::merge::{MergeContext, Mergeable};
use crate::policy::LockedFields;
use curator_types::{MetadataField, Shape};
use serde::{Deserialize, Serialize};

/// A feature film.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    #[serde(flatten)]
    pub base: BaseItem,
    /// Box set the movie belongs to.
    pub collection_name: Option<String>,
    pub trailer_urls: Vec<String>,
}

impl Shape for Movie {
    const TYPE_KEY: &'static str = "curator.model.Movie";
}

impl Mergeable for Movie {
    const RESULT_TYPE_KEY: &'static str = "curator.model.MetadataResult<Movie>";

    fn merge_fields(source: &Self, target: &mut Self, ctx: &MergeContext<'_>) {
        BaseItem::merge_fields(&source.base, &mut target.base, ctx);
        ctx.text(Some(MetadataField::Collection), &source.collection_name, &mut target.collection_name);
        ctx.list(None, &source.trailer_urls, &mut target.trailer_urls);
    }

    fn locked_fields(&self) -> LockedFields {
        self.base.locked_fields()
    }

    fn is_item_locked(&self) -> bool {
        self.base.is_item_locked()
    }
}
