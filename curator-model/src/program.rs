use crate::item::BaseItem;
use crate::merge::{MergeContext, Mergeable};
use crate::policy::LockedFields;
use chrono::{DateTime, Utc};
use curator_types::{MetadataField, Shape};
use serde::{Deserialize, Serialize};

/// A scheduled live-TV program (guide entry).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveTvProgram {
    #[serde(flatten)]
    pub base: BaseItem,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub episode_title: Option<String>,
    pub episode_number: Option<i32>,
    pub season_number: Option<i32>,
    pub series_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub is_movie: bool,
    pub is_series: bool,
    pub is_sports: bool,
    pub is_news: bool,
    pub is_kids: bool,
    pub is_live: bool,
    pub is_premiere: bool,
}

impl Shape for LiveTvProgram {
    const TYPE_KEY: &'static str = "curator.model.LiveTvProgram";
}

impl Mergeable for LiveTvProgram {
    const RESULT_TYPE_KEY: &'static str = "curator.model.MetadataResult<LiveTvProgram>";

    fn merge_fields(source: &Self, target: &mut Self, ctx: &MergeContext<'_>) {
        BaseItem::merge_fields(&source.base, &mut target.base, ctx);

        ctx.text(None, &source.channel_id, &mut target.channel_id);
        ctx.text(Some(MetadataField::ChannelName), &source.channel_name, &mut target.channel_name);
        ctx.text(Some(MetadataField::EpisodeTitle), &source.episode_title, &mut target.episode_title);
        ctx.value(None, &source.episode_number, &mut target.episode_number);
        ctx.value(None, &source.season_number, &mut target.season_number);
        ctx.text(None, &source.series_id, &mut target.series_id);
        ctx.value(None, &source.start_date, &mut target.start_date);

        // Guide classification only ever gets more specific.
        ctx.flag(source.is_movie, &mut target.is_movie);
        ctx.flag(source.is_series, &mut target.is_series);
        ctx.flag(source.is_sports, &mut target.is_sports);
        ctx.flag(source.is_news, &mut target.is_news);
        ctx.flag(source.is_kids, &mut target.is_kids);
        ctx.flag(source.is_live, &mut target.is_live);
        ctx.flag(source.is_premiere, &mut target.is_premiere);
    }

    fn locked_fields(&self) -> LockedFields {
        self.base.locked_fields()
    }

    fn is_item_locked(&self) -> bool {
        self.base.is_item_locked()
    }
}
