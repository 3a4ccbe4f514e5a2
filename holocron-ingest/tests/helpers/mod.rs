//! Shared test helpers
//!
//! `CountingFetcher` serves canned JSON keyed by cache signature and counts
//! every request that reaches it, so tests can tell cache hits from misses.

#![allow(dead_code)]

use holocron_ingest::{cache_key, FetchError, RawEntity, ResourceFetcher};
use serde_json::{json, Value};
use std::cell::Cell;
use std::collections::HashMap;

pub const BASE_URL: &str = "https://swapi.py4e.com/api";
pub const PEOPLE: &str = "https://swapi.py4e.com/api/people/";
pub const PLANETS: &str = "https://swapi.py4e.com/api/planets/";
pub const STARSHIPS: &str = "https://swapi.py4e.com/api/starships/";
pub const TATOOINE: &str = "https://swapi.py4e.com/api/planets/1/";
pub const HUMAN: &str = "https://swapi.py4e.com/api/species/1/";
pub const DROID: &str = "https://swapi.py4e.com/api/species/2/";

#[derive(Default)]
pub struct CountingFetcher {
    responses: HashMap<String, Value>,
    calls: Cell<usize>,
}

impl CountingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, endpoint: &str, query: &[(&str, &str)], response: Value) -> Self {
        self.responses.insert(cache_key(endpoint, query), response);
        self
    }

    /// Respond to `?search=<name>` on `endpoint` with a single result
    pub fn with_search(self, endpoint: &str, name: &str, result: Value) -> Self {
        self.with(
            endpoint,
            &[("search", name)],
            json!({"count": 1, "next": null, "previous": null, "results": [result]}),
        )
    }

    /// Respond to `?search=<name>` on the people endpoint with no results
    pub fn with_search_empty(self, name: &str) -> Self {
        self.with(
            PEOPLE,
            &[("search", name)],
            json!({"count": 0, "next": null, "previous": null, "results": []}),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ResourceFetcher for CountingFetcher {
    fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .get(&cache_key(endpoint, query))
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: endpoint.to_string(),
                status: 404,
            })
    }
}

pub fn object(value: Value) -> RawEntity {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

/// Remote fixtures shaped like the public API's responses
pub fn swapi_fixture() -> CountingFetcher {
    CountingFetcher::new()
        .with_search(
            PEOPLE,
            "Anakin Skywalker",
            json!({
                "name": "Anakin Skywalker",
                "height": "188",
                "mass": "84",
                "birth_year": "41.9BBY",
                "homeworld": TATOOINE,
                "species": [],
                "url": "https://swapi.py4e.com/api/people/11/",
            }),
        )
        .with_search(
            PEOPLE,
            "Obi-Wan Kenobi",
            json!({
                "name": "Obi-Wan Kenobi",
                "height": "182",
                "mass": "77",
                "birth_year": "57BBY",
                "homeworld": "https://swapi.py4e.com/api/planets/20/",
                "species": [HUMAN],
                "url": "https://swapi.py4e.com/api/people/10/",
            }),
        )
        .with_search(
            PEOPLE,
            "R2-D2",
            json!({
                "name": "R2-D2",
                "height": "96",
                "mass": "32",
                "birth_year": "33BBY",
                "homeworld": "https://swapi.py4e.com/api/planets/8/",
                "species": [DROID],
                "url": "https://swapi.py4e.com/api/people/3/",
            }),
        )
        .with_search(
            PEOPLE,
            "Padmé Amidala",
            json!({
                "name": "Padmé Amidala",
                "height": "185",
                "mass": "45",
                "birth_year": "46BBY",
                "homeworld": "https://swapi.py4e.com/api/planets/8/",
                "species": [HUMAN],
                "url": "https://swapi.py4e.com/api/people/35/",
            }),
        )
        .with_search(
            PLANETS,
            "Tatooine",
            json!({
                "name": "Tatooine",
                "diameter": "10465",
                "gravity": "1 standard",
                "climate": "arid",
                "terrain": "desert",
                "population": "200000",
                "url": TATOOINE,
            }),
        )
        .with_search(
            STARSHIPS,
            "Twilight",
            json!({
                "name": "Twilight",
                "model": "G9 Rigger-class light freighter",
                "length": "34.1",
                "crew": "2",
                "passengers": "6",
                "MGLT": "unknown",
                "url": null,
            }),
        )
        .with(
            TATOOINE,
            &[],
            json!({
                "name": "Tatooine",
                "diameter": "10465",
                "gravity": "1 standard",
                "climate": "arid",
                "terrain": "desert",
                "population": "200000",
                "url": TATOOINE,
            }),
        )
        .with(
            "https://swapi.py4e.com/api/planets/20/",
            &[],
            json!({"name": "Stewjon", "gravity": "1 standard", "url": "https://swapi.py4e.com/api/planets/20/"}),
        )
        .with(
            "https://swapi.py4e.com/api/planets/8/",
            &[],
            json!({"name": "Naboo", "diameter": "12120", "url": "https://swapi.py4e.com/api/planets/8/"}),
        )
        .with(HUMAN, &[], json!({"name": "Human"}))
        .with(DROID, &[], json!({"name": "Droid"}))
}
