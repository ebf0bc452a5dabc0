use chrono::Utc;
use curator_codec::{CodecError, Serializer};
use curator_merge::{
    MemoryProviderRepository, MergeError, MergeResult, MetadataService, MetadataStatus,
    ProviderRepository, RefreshJob, RefreshOptions, SqliteProviderRepository,
};
use curator_model::{
    BaseItem, CollectionPolicy, LiveTvProgram, Mergeable, MetadataResult, Person, PersonKind,
};
use curator_types::{ItemId, MetadataField, TypeKey};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn candidate(provider: &str, name: Option<&str>, year: Option<i32>) -> MetadataResult<BaseItem> {
    MetadataResult::from_provider(
        provider,
        BaseItem {
            name: name.map(str::to_string),
            production_year: year,
            ..BaseItem::default()
        },
    )
}

fn service(
    options: RefreshOptions,
) -> (Arc<MemoryProviderRepository>, MetadataService<BaseItem>) {
    init_tracing();
    let repo = Arc::new(MemoryProviderRepository::new());
    let service = MetadataService::new(repo.clone(), options);
    (repo, service)
}

/// Fails every write for one item, delegating everything else.
struct FailingFor {
    inner: MemoryProviderRepository,
    broken: ItemId,
}

impl ProviderRepository for FailingFor {
    fn save_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
        payload: &[u8],
    ) -> MergeResult<()> {
        if item_id == self.broken {
            return Err(MergeError::Repository("disk full".into()));
        }
        self.inner.save_result(item_id, provider, type_key, payload)
    }

    fn load_result(
        &self,
        item_id: ItemId,
        provider: &str,
        type_key: &TypeKey,
    ) -> MergeResult<Option<Vec<u8>>> {
        self.inner.load_result(item_id, provider, type_key)
    }

    fn delete_results(&self, item_id: ItemId) -> MergeResult<usize> {
        self.inner.delete_results(item_id)
    }

    fn save_status(&self, status: &MetadataStatus) -> MergeResult<()> {
        self.inner.save_status(status)
    }

    fn get_status(&self, item_id: ItemId) -> MergeResult<Option<MetadataStatus>> {
        self.inner.get_status(item_id)
    }
}

// ── refresh ──────────────────────────────────────────────────────

#[test]
fn higher_priority_provider_wins_gaps_filled_from_others() {
    let (_, service) = service(RefreshOptions::default());
    let item = ItemId::new();
    let mut target = MetadataResult::<BaseItem>::default();

    let update = service
        .refresh(
            item,
            &mut target,
            &[
                candidate("tmdb", Some("Heat"), None),
                candidate("omdb", Some("Heat (1995)"), Some(1995)),
            ],
        )
        .unwrap();

    assert!(update.changed);
    assert_eq!(update.applied_providers, vec!["tmdb".to_string(), "omdb".to_string()]);
    assert_eq!(target.item.name.as_deref(), Some("Heat"));
    assert_eq!(target.item.production_year, Some(1995));
}

#[test]
fn refresh_records_candidates_and_status() {
    let (repo, service) = service(RefreshOptions::default());
    let item = ItemId::new();
    let mut target = MetadataResult::<BaseItem>::default();
    let tmdb = candidate("tmdb", Some("Heat"), Some(1995));

    service.refresh(item, &mut target, &[tmdb.clone()]).unwrap();

    let stored = repo
        .load_result(item, "tmdb", &TypeKey::new(BaseItem::RESULT_TYPE_KEY))
        .unwrap()
        .unwrap();
    let decoded: MetadataResult<BaseItem> =
        service.serializer().decode_from_bytes(&stored).unwrap();
    assert_eq!(decoded, tmdb);

    let status = service.status(item).unwrap().unwrap();
    assert!(status.is_success());
    assert_eq!(status.providers, vec!["tmdb".to_string()]);
}

#[test]
fn unchanged_refresh_reports_no_change() {
    let (_, service) = service(RefreshOptions::default());
    let item = ItemId::new();
    let mut target = MetadataResult::<BaseItem>::default();
    let candidates = [candidate("tmdb", Some("Heat"), Some(1995))];

    assert!(service.refresh(item, &mut target, &candidates).unwrap().changed);
    assert!(!service.refresh(item, &mut target, &candidates).unwrap().changed);
}

#[test]
fn empty_candidates_leave_target_alone() {
    let (_, service) = service(RefreshOptions::default());
    let item = ItemId::new();
    let mut target = candidate("local", Some("Mine"), None);
    let before = target.clone();

    let mut nothing = candidate("tmdb", Some("Ghost"), None);
    nothing.has_metadata = false;
    let update = service.refresh(item, &mut target, &[nothing]).unwrap();

    assert!(!update.changed);
    assert!(update.applied_providers.is_empty());
    assert_eq!(target, before);
}

#[test]
fn replace_all_metadata_respects_configured_and_item_locks() {
    let options = RefreshOptions {
        replace_all_metadata: true,
        locked_fields: [MetadataField::Name].into_iter().collect(),
        ..RefreshOptions::default()
    };
    let (_, service) = service(options);
    let item = ItemId::new();

    let mut target = candidate("local", Some("Bar"), None);
    target.item.overview = Some("Kept".into());
    target.item.settings.locked_fields = vec![MetadataField::Overview];
    target.item.genres = vec!["Drama".into()];

    let mut source = candidate("tmdb", Some("Foo"), Some(2020));
    source.item.overview = Some("Replaced".into());
    source.item.genres = vec!["Crime".into()];

    service.refresh(item, &mut target, &[source]).unwrap();

    assert_eq!(target.item.name.as_deref(), Some("Bar"));
    assert_eq!(target.item.overview.as_deref(), Some("Kept"));
    assert_eq!(target.item.production_year, Some(2020));
    assert_eq!(target.item.genres, vec!["Crime".to_string()]);
}

#[test]
fn locked_item_is_never_touched() {
    init_tracing();
    let repo = Arc::new(MemoryProviderRepository::new());
    let service = MetadataService::<LiveTvProgram>::new(
        repo,
        RefreshOptions {
            replace_all_metadata: true,
            merge_metadata_settings: true,
            ..RefreshOptions::default()
        },
    );
    let item = ItemId::new();

    let mut target = MetadataResult::from_provider(
        "local",
        LiveTvProgram {
            base: BaseItem::named("Bar"),
            episode_number: Some(1),
            ..LiveTvProgram::default()
        },
    );
    target.item.base.settings.is_locked = true;
    target.people = vec![Person::new("Ann", PersonKind::Director)];
    target.has_metadata = false;
    let before = target.clone();

    let mut program = LiveTvProgram {
        base: BaseItem::named("Foo"),
        channel_id: Some("c1".into()),
        episode_number: Some(7),
        season_number: Some(2),
        series_id: Some("s1".into()),
        start_date: Some(Utc::now()),
        is_sports: true,
        ..LiveTvProgram::default()
    };
    program.base.production_year = Some(2020);
    program.base.set_provider_id("tmdb", "42");
    let mut source = MetadataResult::from_provider("tmdb", program)
        .with_people(vec![Person::new("Bob", PersonKind::Actor)]);
    source.result_language = Some("en".into());

    let update = service.refresh(item, &mut target, &[source]).unwrap();

    assert!(!update.changed);
    assert!(update.applied_providers.is_empty());
    assert_eq!(target, before);
    assert!(service.status(item).unwrap().unwrap().is_success());
}

#[test]
fn fill_if_empty_collection_policy_from_options() {
    let (_, service) = service(RefreshOptions {
        collection_policy: CollectionPolicy::FillIfEmpty,
        ..RefreshOptions::default()
    });
    let item = ItemId::new();
    let mut target = MetadataResult::<BaseItem>::default();
    target.item.tags = vec!["mine".into()];

    let mut source = candidate("tmdb", None, None);
    source.item.tags = vec!["theirs".into()];
    source.item.studios = vec!["Warner".into()];
    service.refresh(item, &mut target, &[source]).unwrap();

    assert_eq!(target.item.tags, vec!["mine".to_string()]);
    assert_eq!(target.item.studios, vec!["Warner".to_string()]);
}

#[test]
fn program_service_merges_program_fields() {
    init_tracing();
    let repo = Arc::new(SqliteProviderRepository::open_in_memory().unwrap());
    let service = MetadataService::<LiveTvProgram>::new(repo, RefreshOptions::default());
    let item = ItemId::new();
    let mut target = MetadataResult::<LiveTvProgram>::default();

    let source = MetadataResult::from_provider(
        "xmltv",
        LiveTvProgram {
            base: BaseItem::named("News at Ten"),
            channel_name: Some("ITV".into()),
            is_news: true,
            ..LiveTvProgram::default()
        },
    );
    let update = service.refresh(item, &mut target, &[source]).unwrap();

    assert!(update.changed);
    assert_eq!(target.item.channel_name.as_deref(), Some("ITV"));
    assert!(target.item.is_news);
    assert_eq!(service.status(item).unwrap().unwrap().providers, vec!["xmltv".to_string()]);
}

// ── refresh_from_repository ──────────────────────────────────────

#[test]
fn refresh_from_repository_replays_stored_results() {
    let (_, service) = service(RefreshOptions::default());
    let item = ItemId::new();
    let mut first = MetadataResult::<BaseItem>::default();
    service
        .refresh(
            item,
            &mut first,
            &[
                candidate("tmdb", Some("Heat"), None),
                candidate("omdb", None, Some(1995)),
            ],
        )
        .unwrap();

    let mut rebuilt = MetadataResult::<BaseItem>::default();
    let update = service
        .refresh_from_repository(item, &mut rebuilt, &["tmdb", "omdb", "tvdb"])
        .unwrap();

    assert_eq!(update.applied_providers, vec!["tmdb".to_string(), "omdb".to_string()]);
    assert_eq!(rebuilt.item, first.item);
}

#[test]
fn refresh_from_repository_skips_corrupt_results() {
    let (repo, service) = service(RefreshOptions::default());
    let item = ItemId::new();
    let mut target = MetadataResult::<BaseItem>::default();
    service
        .refresh(item, &mut target, &[candidate("tmdb", Some("Heat"), Some(1995))])
        .unwrap();
    repo.save_result(
        item,
        "omdb",
        &TypeKey::new(BaseItem::RESULT_TYPE_KEY),
        b"{\"type\": not json",
    )
    .unwrap();

    let mut rebuilt = MetadataResult::<BaseItem>::default();
    let update = service
        .refresh_from_repository(item, &mut rebuilt, &["omdb", "tmdb"])
        .unwrap();

    assert_eq!(update.applied_providers, vec!["tmdb".to_string()]);
    assert_eq!(rebuilt.item.name.as_deref(), Some("Heat"));

    let status = service.status(item).unwrap().unwrap();
    assert!(!status.is_success());
    assert!(status.last_error.unwrap().starts_with("omdb"));
}

// ── refresh_many ─────────────────────────────────────────────────

#[test]
fn refresh_many_isolates_failures() {
    init_tracing();
    let broken = ItemId::new();
    let healthy = ItemId::new();
    let repo = Arc::new(FailingFor {
        inner: MemoryProviderRepository::new(),
        broken,
    });
    let service = MetadataService::<BaseItem>::new(repo, RefreshOptions::default());

    let mut broken_target = MetadataResult::<BaseItem>::default();
    let mut healthy_target = MetadataResult::<BaseItem>::default();
    let outcomes = service.refresh_many(vec![
        RefreshJob {
            item_id: broken,
            target: &mut broken_target,
            candidates: vec![candidate("tmdb", Some("Lost"), None)],
        },
        RefreshJob {
            item_id: healthy,
            target: &mut healthy_target,
            candidates: vec![candidate("tmdb", Some("Found"), None)],
        },
    ]);

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].0, broken);
    assert!(matches!(outcomes[0].1, Err(MergeError::Repository(_))));
    assert_eq!(outcomes[1].0, healthy);
    assert!(outcomes[1].1.as_ref().unwrap().changed);

    assert_eq!(broken_target, MetadataResult::default());
    assert_eq!(healthy_target.item.name.as_deref(), Some("Found"));

    let failed = service.status(broken).unwrap().unwrap();
    assert_eq!(failed.last_error.as_deref(), Some("repository error: disk full"));
    assert!(service.status(healthy).unwrap().unwrap().is_success());
}

// ── persistence ──────────────────────────────────────────────────

#[test]
fn persisted_record_reloads_without_regression() {
    let (_, service) = service(RefreshOptions::default());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("item.json");
    let item = ItemId::new();

    let mut source = candidate("tmdb", Some("Heat"), Some(1995))
        .with_people(vec![Person::new("Al Pacino", PersonKind::Actor).with_role("Hanna")]);
    source.item.community_rating = Some(8.5);
    source.item.set_provider_id("imdb", "tt0113277");
    source.result_language = Some("en".into());

    let mut target = MetadataResult::<BaseItem>::default();
    service.refresh(item, &mut target, &[source.clone()]).unwrap();

    let serializer = Serializer::default();
    service.persist(&serializer, &target, &path).unwrap();
    let mut reloaded = service.load(&serializer, &path).unwrap();
    assert_eq!(reloaded, target);

    // Refreshing the reloaded record with the same data changes nothing.
    let update = service.refresh(item, &mut reloaded, &[source]).unwrap();
    assert!(!update.changed);
    assert_eq!(reloaded, target);
}

#[test]
fn load_missing_record_is_resource_error() {
    let (_, service) = service(RefreshOptions::default());
    let dir = tempfile::tempdir().unwrap();

    let err = service
        .load(&Serializer::default(), dir.path().join("missing.json"))
        .unwrap_err();
    assert!(matches!(err, MergeError::Codec(CodecError::Resource { .. })));
}

// ── options ──────────────────────────────────────────────────────

#[test]
fn options_default_when_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let options =
        RefreshOptions::load(&Serializer::default(), dir.path().join("options.json")).unwrap();
    assert_eq!(options, RefreshOptions::default());
    assert!(!options.policy().replace_data);
}

#[test]
fn options_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    let serializer = Serializer::default();
    let options = RefreshOptions {
        replace_all_metadata: true,
        merge_metadata_settings: true,
        collection_policy: CollectionPolicy::FillIfEmpty,
        locked_fields: [MetadataField::Name, MetadataField::Cast].into_iter().collect(),
    };

    options.save(&serializer, &path).unwrap();
    let loaded = RefreshOptions::load(&serializer, &path).unwrap();

    assert_eq!(loaded, options);
    let policy = loaded.policy();
    assert!(policy.replace_data);
    assert!(policy.merge_metadata_settings);
    assert_eq!(policy.collections, CollectionPolicy::FillIfEmpty);
}

#[test]
fn corrupt_options_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(&path, b"{ nope").unwrap();

    let err = RefreshOptions::load(&Serializer::default(), &path).unwrap_err();
    assert!(err.is_decode());
}
