//! Field identifiers used by field locks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A metadata field a user can lock against automatic overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Name,
    OriginalTitle,
    SortName,
    Overview,
    Tagline,
    Genres,
    Studios,
    Tags,
    Cast,
    OfficialRating,
    CommunityRating,
    CriticRating,
    ProductionYear,
    PremiereDate,
    EndDate,
    Runtime,
    ProductionLocations,
    HomePageUrl,
    EpisodeTitle,
    ChannelName,
    Collection,
}

impl MetadataField {
    /// Every lockable field, in declaration order.
    pub const ALL: [MetadataField; 21] = [
        MetadataField::Name,
        MetadataField::OriginalTitle,
        MetadataField::SortName,
        MetadataField::Overview,
        MetadataField::Tagline,
        MetadataField::Genres,
        MetadataField::Studios,
        MetadataField::Tags,
        MetadataField::Cast,
        MetadataField::OfficialRating,
        MetadataField::CommunityRating,
        MetadataField::CriticRating,
        MetadataField::ProductionYear,
        MetadataField::PremiereDate,
        MetadataField::EndDate,
        MetadataField::Runtime,
        MetadataField::ProductionLocations,
        MetadataField::HomePageUrl,
        MetadataField::EpisodeTitle,
        MetadataField::ChannelName,
        MetadataField::Collection,
    ];

    /// Returns the snake_case name used in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Name => "name",
            MetadataField::OriginalTitle => "original_title",
            MetadataField::SortName => "sort_name",
            MetadataField::Overview => "overview",
            MetadataField::Tagline => "tagline",
            MetadataField::Genres => "genres",
            MetadataField::Studios => "studios",
            MetadataField::Tags => "tags",
            MetadataField::Cast => "cast",
            MetadataField::OfficialRating => "official_rating",
            MetadataField::CommunityRating => "community_rating",
            MetadataField::CriticRating => "critic_rating",
            MetadataField::ProductionYear => "production_year",
            MetadataField::PremiereDate => "premiere_date",
            MetadataField::EndDate => "end_date",
            MetadataField::Runtime => "runtime",
            MetadataField::ProductionLocations => "production_locations",
            MetadataField::HomePageUrl => "home_page_url",
            MetadataField::EpisodeTitle => "episode_title",
            MetadataField::ChannelName => "channel_name",
            MetadataField::Collection => "collection",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataField {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| crate::Error::UnknownField(s.to_string()))
    }
}
