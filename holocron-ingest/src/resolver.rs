//! Nested entity resolution
//!
//! Expands the references a person or droid carries:
//! - **Homeworld**: the planet URL is resolved through the cache, optionally
//!   merged with the matching supplementary planet record (linked by name),
//!   and mapped as a planet.
//! - **Species**: the first URL of the species list is resolved through the
//!   cache and reduced to its `name`.
//!
//! Every resolved value comes out of the cache as an owned copy, so resolving
//! the same reference twice yields equal but independent results.

use crate::cache::CacheStore;
use crate::client::ResourceFetcher;
use crate::error::{IngestError, IngestResult};
use crate::linker::{lookup_first_str, overlay};
use crate::mapper::{NestedResolver, SchemaMapper};
use crate::types::{Kind, NestedField, RawEntity};
use serde_json::Value;
use tracing::debug;

/// Merge a supplementary planet record onto a fetched one
///
/// Supplementary fields overwrite fetched fields of the same name. `url`
/// keeps the fetched value unless the supplementary record carries its own.
pub fn merge_homeworld(fetched: &mut RawEntity, supplementary: &RawEntity) {
    overlay(fetched, supplementary);
}

/// Cache-backed resolver for homeworld and species references
pub struct NestedEntityResolver<'a, F> {
    cache: &'a mut CacheStore<F>,
    /// Supplementary planet dataset (optional)
    planets: Option<&'a [RawEntity]>,
}

impl<'a, F: ResourceFetcher> NestedEntityResolver<'a, F> {
    pub fn new(cache: &'a mut CacheStore<F>) -> Self {
        Self {
            cache,
            planets: None,
        }
    }

    /// Enrich homeworlds from a supplementary planet dataset
    pub fn with_planets(mut self, planets: &'a [RawEntity]) -> Self {
        self.planets = Some(planets);
        self
    }

    /// Resolve a planet reference into a mapped planet entity
    pub fn homeworld(&mut self, mapper: &SchemaMapper, reference: &Value) -> IngestResult<Value> {
        let url = reference.as_str().ok_or_else(|| {
            IngestError::Contract(format!(
                "Homeworld reference must be a URL string, got {}",
                reference
            ))
        })?;

        let mut planet = match self.cache.resolve(url, &[])? {
            Value::Object(planet) => planet,
            other => {
                return Err(IngestError::Contract(format!(
                    "Homeworld resource {} is not an entity object: {}",
                    url, other
                )))
            }
        };

        if let Some(planets) = self.planets {
            let supplementary = planet
                .get("name")
                .and_then(Value::as_str)
                .and_then(|name| lookup_first_str(planets, "name", name));

            if let Some(supplementary) = supplementary {
                debug!(url = %url, "Merging supplementary homeworld record");
                merge_homeworld(&mut planet, supplementary);
            }
        }

        let mapped = mapper.transform(&planet, Kind::Planet, self)?;
        Ok(Value::Object(mapped))
    }

    /// Resolve a species reference list into the first species' name
    ///
    /// An empty list resolves to `null`. A bare URL string is accepted in
    /// place of a one-element list.
    pub fn species(&mut self, reference: &Value) -> IngestResult<Value> {
        let url = match reference {
            Value::Array(items) => match items.first() {
                None => return Ok(Value::Null),
                Some(Value::String(url)) => url.as_str(),
                Some(other) => {
                    return Err(IngestError::Contract(format!(
                        "Species reference must be a URL string, got {}",
                        other
                    )))
                }
            },
            Value::String(url) => url.as_str(),
            other => {
                return Err(IngestError::Contract(format!(
                    "Species reference must be a list of URLs, got {}",
                    other
                )))
            }
        };

        let species = self.cache.resolve(url, &[])?;
        Ok(species.get("name").cloned().unwrap_or(Value::Null))
    }
}

impl<'a, F: ResourceFetcher> NestedResolver for NestedEntityResolver<'a, F> {
    fn resolve_nested(
        &mut self,
        mapper: &SchemaMapper,
        field: NestedField,
        reference: Value,
    ) -> IngestResult<Value> {
        match field {
            NestedField::Homeworld => self.homeworld(mapper, &reference),
            NestedField::Species => self.species(&reference),
        }
    }
}
