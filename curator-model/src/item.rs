use crate::merge::{MergeContext, Mergeable};
use crate::policy::LockedFields;
use chrono::{DateTime, Utc};
use curator_types::{MetadataField, Shape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata common to every library item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseItem {
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub sort_name: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub tags: Vec<String>,
    pub production_locations: Vec<String>,
    pub official_rating: Option<String>,
    pub community_rating: Option<f32>,
    pub critic_rating: Option<f32>,
    pub production_year: Option<i32>,
    pub premiere_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Runtime in 100ns ticks.
    pub runtime_ticks: Option<i64>,
    pub home_page_url: Option<String>,
    /// External ids keyed by provider name (e.g. "tmdb", "imdb").
    pub provider_ids: BTreeMap<String, String>,
    pub settings: ItemSettings,
}

/// Per-item bookkeeping, merged only when the policy asks for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemSettings {
    /// Fields the user pinned on this item.
    pub locked_fields: Vec<MetadataField>,
    /// Whole item is exempt from automatic refresh. Every field counts as
    /// locked and refreshes leave the record untouched.
    pub is_locked: bool,
    pub date_created: Option<DateTime<Utc>>,
    pub preferred_metadata_language: Option<String>,
    pub preferred_metadata_country_code: Option<String>,
}

impl BaseItem {
    /// Shorthand for an item with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Returns the id recorded for `provider`, if any.
    pub fn provider_id(&self, provider: &str) -> Option<&str> {
        self.provider_ids.get(provider).map(String::as_str)
    }

    pub fn set_provider_id(&mut self, provider: impl Into<String>, id: impl Into<String>) {
        self.provider_ids.insert(provider.into(), id.into());
    }
}

impl Shape for BaseItem {
    const TYPE_KEY: &'static str = "curator.model.BaseItem";
}

impl Mergeable for BaseItem {
    const RESULT_TYPE_KEY: &'static str = "curator.model.MetadataResult<BaseItem>";

    fn merge_fields(source: &Self, target: &mut Self, ctx: &MergeContext<'_>) {
        ctx.text(Some(MetadataField::Name), &source.name, &mut target.name);
        ctx.text(Some(MetadataField::OriginalTitle), &source.original_title, &mut target.original_title);
        ctx.text(Some(MetadataField::SortName), &source.sort_name, &mut target.sort_name);
        ctx.text(Some(MetadataField::Overview), &source.overview, &mut target.overview);
        ctx.text(Some(MetadataField::Tagline), &source.tagline, &mut target.tagline);

        ctx.list(Some(MetadataField::Genres), &source.genres, &mut target.genres);
        ctx.list(Some(MetadataField::Studios), &source.studios, &mut target.studios);
        ctx.list(Some(MetadataField::Tags), &source.tags, &mut target.tags);
        ctx.list(
            Some(MetadataField::ProductionLocations),
            &source.production_locations,
            &mut target.production_locations,
        );

        ctx.text(Some(MetadataField::OfficialRating), &source.official_rating, &mut target.official_rating);
        ctx.value(Some(MetadataField::CommunityRating), &source.community_rating, &mut target.community_rating);
        ctx.value(Some(MetadataField::CriticRating), &source.critic_rating, &mut target.critic_rating);
        ctx.value(Some(MetadataField::ProductionYear), &source.production_year, &mut target.production_year);
        ctx.value(Some(MetadataField::PremiereDate), &source.premiere_date, &mut target.premiere_date);
        ctx.value(Some(MetadataField::EndDate), &source.end_date, &mut target.end_date);
        ctx.value(Some(MetadataField::Runtime), &source.runtime_ticks, &mut target.runtime_ticks);
        ctx.text(Some(MetadataField::HomePageUrl), &source.home_page_url, &mut target.home_page_url);

        ctx.map(&source.provider_ids, &mut target.provider_ids);

        if ctx.policy().merge_metadata_settings {
            ItemSettings::merge_into(&source.settings, &mut target.settings, ctx);
        }
    }

    fn locked_fields(&self) -> LockedFields {
        if self.settings.is_locked {
            LockedFields::all()
        } else {
            self.settings.locked_fields.iter().collect()
        }
    }

    fn is_item_locked(&self) -> bool {
        self.settings.is_locked
    }
}

impl ItemSettings {
    fn merge_into(source: &Self, target: &mut Self, ctx: &MergeContext<'_>) {
        ctx.list(None, &source.locked_fields, &mut target.locked_fields);
        ctx.flag(source.is_locked, &mut target.is_locked);
        ctx.value(None, &source.date_created, &mut target.date_created);
        ctx.text(
            None,
            &source.preferred_metadata_language,
            &mut target.preferred_metadata_language,
        );
        ctx.text(
            None,
            &source.preferred_metadata_country_code,
            &mut target.preferred_metadata_country_code,
        );
    }
}
