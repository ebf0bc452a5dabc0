use curator_model::{BaseItem, LiveTvProgram, MetadataResult, Movie};
use curator_types::Shape;
use pretty_assertions::assert_eq;

#[test]
fn result_type_keys_are_distinct() {
    assert_eq!(
        MetadataResult::<LiveTvProgram>::TYPE_KEY,
        "curator.model.MetadataResult<LiveTvProgram>"
    );
    assert_ne!(
        MetadataResult::<Movie>::TYPE_KEY,
        MetadataResult::<BaseItem>::TYPE_KEY
    );
}

#[test]
fn program_flattens_base_fields() {
    let program = LiveTvProgram {
        base: BaseItem::named("Match of the Day"),
        is_sports: true,
        ..LiveTvProgram::default()
    };
    let value = serde_json::to_value(&program).unwrap();
    assert_eq!(value["name"], "Match of the Day");
    assert_eq!(value["is_sports"], true);
    assert!(value.get("base").is_none());
}

#[test]
fn missing_fields_take_defaults() {
    let program: LiveTvProgram = serde_json::from_str(r#"{"name":"Late Show"}"#).unwrap();
    assert_eq!(program.base.name.as_deref(), Some("Late Show"));
    assert!(program.base.genres.is_empty());
    assert!(!program.is_live);
}

#[test]
fn result_requires_item_only() {
    let result: MetadataResult<Movie> =
        serde_json::from_str(r#"{"item":{"name":"Heat","collection_name":"Mann"}}"#).unwrap();
    assert_eq!(result.item.base.name.as_deref(), Some("Heat"));
    assert_eq!(result.item.collection_name.as_deref(), Some("Mann"));
    assert!(result.people.is_empty());
    assert!(!result.has_metadata);
}

#[test]
fn movie_json_roundtrip() {
    let mut movie = Movie {
        base: BaseItem::named("Heat"),
        trailer_urls: vec!["https://example.invalid/heat".into()],
        ..Movie::default()
    };
    movie.base.production_year = Some(1995);
    movie.base.set_provider_id("imdb", "tt0113277");

    let json = serde_json::to_string(&movie).unwrap();
    let back: Movie = serde_json::from_str(&json).unwrap();
    assert_eq!(back, movie);
}
