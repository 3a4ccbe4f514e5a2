//! Ingest pipeline
//!
//! Wires the cache, linker, mapper and nested resolver together:
//!
//! ```text
//! search (cached) → first match → overlay supplementary record → map
//!                                                              ↳ homeworld / species (cached)
//! ```
//!
//! Search results are the envelope returned by `?search=<name>`; only the first
//! match is used.

use crate::boarding::{board, Ship};
use crate::cache::CacheStore;
use crate::client::{resource_url, Resource, ResourceFetcher};
use crate::datasets::SupplementaryData;
use crate::error::{IngestError, IngestResult};
use crate::linker::{link_and_overlay, lookup_first_str};
use crate::mapper::SchemaMapper;
use crate::resolver::{merge_homeworld, NestedEntityResolver};
use crate::types::{Kind, NormalizedEntity, RawEntity};
use serde_json::Value;
use tracing::{debug, info};

/// Key linking remote records to supplementary records
const LINK_FIELD: &str = "name";

/// Fetch-and-normalize orchestration over one cache and one mapping
pub struct IngestPipeline<F> {
    cache: CacheStore<F>,
    mapper: SchemaMapper,
    supplementary: SupplementaryData,
    base_url: String,
}

impl<F: ResourceFetcher> IngestPipeline<F> {
    pub fn new(
        cache: CacheStore<F>,
        mapper: SchemaMapper,
        supplementary: SupplementaryData,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            mapper,
            supplementary,
            base_url: base_url.into(),
        }
    }

    pub fn cache(&self) -> &CacheStore<F> {
        &self.cache
    }

    pub fn mapper(&self) -> &SchemaMapper {
        &self.mapper
    }

    pub fn supplementary(&self) -> &SupplementaryData {
        &self.supplementary
    }

    pub fn into_cache(self) -> CacheStore<F> {
        self.cache
    }

    /// First record returned by searching `resource` for `name`
    pub fn search_first(&mut self, resource: Resource, name: &str) -> IngestResult<RawEntity> {
        let endpoint = resource_url(&self.base_url, resource);
        let envelope = self.cache.resolve(&endpoint, &[("search", name)])?;

        let first = envelope
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first());

        match first {
            Some(Value::Object(record)) => Ok(record.clone()),
            Some(other) => Err(IngestError::Contract(format!(
                "Search result for {:?} at {} is not an entity object: {}",
                name, endpoint, other
            ))),
            None => Err(IngestError::NotFound(format!(
                "No match for {:?} at {}",
                name, endpoint
            ))),
        }
    }

    /// Search, enrich and map a person
    pub fn person(&mut self, name: &str) -> IngestResult<NormalizedEntity> {
        let mut raw = self.search_first(Resource::People, name)?;
        link_and_overlay(&mut raw, &self.supplementary.people, LINK_FIELD);
        self.normalize(&raw, Kind::Person)
    }

    /// Search, enrich and map a droid
    ///
    /// Droids are listed under the people resource remotely.
    pub fn droid(&mut self, name: &str) -> IngestResult<NormalizedEntity> {
        let mut raw = self.search_first(Resource::People, name)?;
        link_and_overlay(&mut raw, &self.supplementary.droids, LINK_FIELD);
        self.normalize(&raw, Kind::Droid)
    }

    /// Person or droid, depending on whether the droid dataset lists the match
    pub fn being(&mut self, name: &str) -> IngestResult<NormalizedEntity> {
        let mut raw = self.search_first(Resource::People, name)?;

        let is_droid = raw
            .get(LINK_FIELD)
            .and_then(Value::as_str)
            .and_then(|found| lookup_first_str(&self.supplementary.droids, LINK_FIELD, found))
            .is_some();

        let (dataset, kind) = if is_droid {
            (&self.supplementary.droids, Kind::Droid)
        } else {
            (&self.supplementary.people, Kind::Person)
        };
        debug!(name = name, kind = %kind, "Classified search match");

        link_and_overlay(&mut raw, dataset, LINK_FIELD);
        self.normalize(&raw, kind)
    }

    /// Search, enrich and map a planet
    pub fn planet(&mut self, name: &str) -> IngestResult<NormalizedEntity> {
        let mut raw = self.search_first(Resource::Planets, name)?;

        let supplementary = raw
            .get(LINK_FIELD)
            .and_then(Value::as_str)
            .and_then(|found| lookup_first_str(&self.supplementary.planets, LINK_FIELD, found));
        if let Some(supplementary) = supplementary {
            merge_homeworld(&mut raw, supplementary);
        }

        self.normalize(&raw, Kind::Planet)
    }

    /// Search, enrich and map a starship
    pub fn starship(&mut self, name: &str) -> IngestResult<Ship> {
        let mut raw = self.search_first(Resource::Starships, name)?;
        link_and_overlay(&mut raw, &self.supplementary.starships, LINK_FIELD);
        self.normalize(&raw, Kind::Starship).map(Ship::new)
    }

    /// Fetch `ship_name` and board it with the named crew and passengers
    ///
    /// `crew` holds `(position, name)` pairs. Every name is looked up as a
    /// person or droid before any assignment happens.
    pub fn board_ship(
        &mut self,
        ship_name: &str,
        crew: &[(String, String)],
        passengers: Option<&[String]>,
    ) -> IngestResult<Ship> {
        let ship = self.starship(ship_name)?;

        let positions: Vec<&str> = crew.iter().map(|(position, _)| position.as_str()).collect();
        let members = crew
            .iter()
            .map(|(_, name)| self.being(name))
            .collect::<IngestResult<Vec<_>>>()?;

        let passengers = match passengers {
            Some(names) => Some(
                names
                    .iter()
                    .map(|name| self.being(name))
                    .collect::<IngestResult<Vec<_>>>()?,
            ),
            None => None,
        };

        let boarded = board(ship, &members, &positions, passengers.as_deref())?;
        info!(ship = ship_name, crew = crew.len(), "Ship boarded");
        Ok(boarded)
    }

    fn normalize(&mut self, raw: &RawEntity, kind: Kind) -> IngestResult<NormalizedEntity> {
        let mut resolver =
            NestedEntityResolver::new(&mut self.cache).with_planets(&self.supplementary.planets);
        self.mapper.transform(raw, kind, &mut resolver)
    }
}
