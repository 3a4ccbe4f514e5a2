//! End-to-end pipeline runs against canned remote fixtures

mod helpers;

use helpers::{object, swapi_fixture, BASE_URL, TATOOINE};
use holocron_ingest::boarding::{CREW_MEMBERS, PASSENGERS_ON_BOARD};
use holocron_ingest::{
    CacheStore, IngestError, IngestPipeline, MappingSpec, SchemaMapper, SupplementaryData,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn supplementary() -> SupplementaryData {
    SupplementaryData {
        people: vec![object(json!({
            "name": "Anakin Skywalker",
            "force_sensitive": true,
            "species": ["https://swapi.py4e.com/api/species/1/"],
        }))],
        droids: vec![object(json!({
            "name": "R2-D2",
            "model": "R2-series astromech droid",
            "manufacturer": "Industrial Automaton",
            "create_year": "33BBY",
            "equipment": "Buzz saw|Electric pike|Periscope",
            "instructions": "Navigate, Repair hyperdrive",
        }))],
        planets: vec![object(json!({
            "name": "Tatooine",
            "region": "Outer Rim Territories",
            "sector": "Arkanis sector",
            "suns": "2",
            "moons": "3",
        }))],
        starships: vec![object(json!({
            "name": "Twilight",
            "url": "https://starwars.fandom.com/wiki/Twilight",
        }))],
    }
}

fn pipeline<F: holocron_ingest::ResourceFetcher>(
    dir: &TempDir,
    fetcher: F,
    supplementary: SupplementaryData,
) -> IngestPipeline<F> {
    let cache = CacheStore::load(dir.path().join("cache.json"), fetcher).unwrap();
    let mapper = SchemaMapper::with_default_sentinels(MappingSpec::standard().unwrap());
    IngestPipeline::new(cache, mapper, supplementary, BASE_URL)
}

#[test]
fn test_person_with_homeworld_and_species() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture();
    let mut pipeline = pipeline(&dir, &fetcher, supplementary());

    let anakin = pipeline.person("Anakin Skywalker").unwrap();

    assert_eq!(anakin["name"], json!("Anakin Skywalker"));
    assert_eq!(anakin["height_cm"], json!(188.0));
    assert_eq!(anakin["mass_kg"], json!(84.0));
    // Fractional years do not parse and pass through unchanged
    assert_eq!(anakin["birth_date"], json!("41.9BBY"));
    assert_eq!(anakin["force_sensitive"], json!(true));
    assert_eq!(anakin["species"], json!("Human"));

    let homeworld = &anakin["homeworld"];
    assert_eq!(homeworld["name"], json!("Tatooine"));
    assert_eq!(homeworld["region"], json!("Outer Rim Territories"));
    assert_eq!(homeworld["suns"], json!(2));
    assert_eq!(homeworld["moons"], json!(3));
    assert_eq!(homeworld["diameter_km"], json!(10465));
    assert_eq!(homeworld["gravity_std_g"], json!(1.0));
    assert_eq!(homeworld["climate"], json!(["arid"]));
    assert_eq!(homeworld["url"], json!(TATOOINE));

    // search + planet + species
    assert_eq!(fetcher.calls(), 3);
}

#[test]
fn test_person_output_follows_mapping_order() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture();
    let mut pipeline = pipeline(&dir, &fetcher, SupplementaryData::default());

    let obi_wan = pipeline.person("Obi-Wan Kenobi").unwrap();

    let keys: Vec<&str> = obi_wan.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        MappingSpec::standard()
            .unwrap()
            .targets(holocron_ingest::Kind::Person)
            .unwrap()
    );
    assert_eq!(obi_wan["birth_date"], json!({"year": 57, "era": "BBY"}));
    assert_eq!(obi_wan["force_sensitive"], Value::Null);
    assert_eq!(obi_wan["homeworld"]["name"], json!("Stewjon"));
}

#[test]
fn test_droid_is_enriched_from_dataset() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture();
    let mut pipeline = pipeline(&dir, &fetcher, supplementary());

    let r2 = pipeline.droid("R2-D2").unwrap();

    assert_eq!(r2["manufacturer"], json!("Industrial Automaton"));
    assert_eq!(r2["create_date"], json!({"year": 33, "era": "BBY"}));
    assert_eq!(r2["height_cm"], json!(96.0));
    assert_eq!(
        r2["equipment"],
        json!(["Buzz saw", "Electric pike", "Periscope"])
    );
    assert_eq!(
        r2["instructions"],
        json!(["Navigate", "Repair hyperdrive"])
    );
}

#[test]
fn test_planet_lookup() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture();
    let mut pipeline = pipeline(&dir, &fetcher, supplementary());

    let tatooine = pipeline.planet("Tatooine").unwrap();

    assert_eq!(tatooine["sector"], json!("Arkanis sector"));
    assert_eq!(tatooine["population"], json!(200000));
    assert_eq!(tatooine["terrain"], json!(["desert"]));
}

#[test]
fn test_repeat_lookups_are_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture();
    let mut pipeline = pipeline(&dir, &fetcher, supplementary());

    let first = pipeline.person("Anakin Skywalker").unwrap();
    let calls = fetcher.calls();
    let second = pipeline.person("Anakin Skywalker").unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.calls(), calls);

    // Name searches are case-insensitive at the cache level
    pipeline.person("anakin skywalker").unwrap();
    assert_eq!(fetcher.calls(), calls);
}

#[test]
fn test_board_twilight() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture();
    let mut pipeline = pipeline(&dir, &fetcher, supplementary());

    let crew = vec![
        ("pilot".to_string(), "Anakin Skywalker".to_string()),
        ("copilot".to_string(), "Obi-Wan Kenobi".to_string()),
        ("gunner".to_string(), "R2-D2".to_string()),
    ];
    let passengers = vec!["Padmé Amidala".to_string(), "R2-D2".to_string()];

    let twilight = pipeline
        .board_ship("Twilight", &crew, Some(passengers.as_slice()))
        .unwrap();

    assert_eq!(twilight.crew_size().unwrap(), 2);
    assert_eq!(twilight.max_passengers().unwrap(), 6);

    let members = twilight.crew_members().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members["pilot"]["name"], json!("Anakin Skywalker"));
    assert_eq!(members["copilot"]["name"], json!("Obi-Wan Kenobi"));

    let on_board = twilight.passengers_on_board().unwrap();
    assert_eq!(on_board.len(), 2);
    assert_eq!(on_board[0]["name"], json!("Padmé Amidala"));
    // R2-D2 is in the droid dataset, so it boards as a droid
    assert_eq!(on_board[1]["create_date"], json!({"year": 33, "era": "BBY"}));

    let entity = twilight.as_entity();
    assert_eq!(entity["url"], json!("https://starwars.fandom.com/wiki/Twilight"));
    assert_eq!(entity["max_megalight_hr"], Value::Null);
    assert!(entity.contains_key(CREW_MEMBERS));
    assert!(entity.contains_key(PASSENGERS_ON_BOARD));
}

#[test]
fn test_unknown_name_is_not_found() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture().with_search_empty("Jar Jar Binks");
    let mut pipeline = pipeline(&dir, &fetcher, SupplementaryData::default());

    let result = pipeline.person("Jar Jar Binks");

    assert!(matches!(result, Err(IngestError::NotFound(_))));
}

#[test]
fn test_unanswered_search_is_fetch_error() {
    let dir = TempDir::new().unwrap();
    let fetcher = swapi_fixture();
    let mut pipeline = pipeline(&dir, &fetcher, SupplementaryData::default());

    let result = pipeline.starship("Millennium Falcon");

    assert!(matches!(result, Err(IngestError::Fetch(_))));
}
