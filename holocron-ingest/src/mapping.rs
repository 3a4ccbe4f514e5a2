//! Field mappings and the coercion rule table
//!
//! A [`MappingSpec`] declares, per kind, which source fields are kept, what
//! they are renamed to, and in which order they appear in the output.
//!
//! Coercion is looked up by `(kind, source field)` in [`RULES`] because the
//! same field name can mean different things for different kinds.

use crate::error::{IngestError, IngestResult};
use crate::types::{Kind, NestedField};
use holocron_common::coercion::{
    coerce_float, coerce_gravity, coerce_int, coerce_list, coerce_year_era,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Built-in mapping document
const STANDARD_MAPPINGS: &str = include_str!("../data/key_mappings.json");

/// One `source → target` field rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub source: String,
    pub target: String,
}

impl FieldMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Per-kind ordered field mappings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSpec {
    kinds: BTreeMap<Kind, Vec<FieldMapping>>,
}

impl MappingSpec {
    /// The mapping document shipped with the crate
    pub fn standard() -> IngestResult<Self> {
        Self::from_json_str(STANDARD_MAPPINGS)
    }

    /// Read a mapping document from disk
    pub fn load(path: &Path) -> IngestResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(holocron_common::Error::from)?;
        Self::from_json_str(&content)
    }

    /// Parse a mapping document
    ///
    /// Top-level keys must be kinds; each value must be an object of
    /// `source: target` string pairs. Object order is the output order.
    pub fn from_json_str(document: &str) -> IngestResult<Self> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| IngestError::Schema(format!("Mapping document is not JSON: {}", e)))?;
        Self::from_value(&value)
    }

    pub fn from_value(document: &Value) -> IngestResult<Self> {
        let Value::Object(entries) = document else {
            return Err(IngestError::Schema(
                "Mapping document must be a JSON object".to_string(),
            ));
        };

        let mut spec = Self::default();
        for (kind_name, fields) in entries {
            let kind: Kind = kind_name.parse()?;

            let Value::Object(pairs) = fields else {
                return Err(IngestError::Schema(format!(
                    "Mapping for {} must be an object",
                    kind
                )));
            };

            let mut mappings = Vec::with_capacity(pairs.len());
            for (source, target) in pairs {
                let target = target.as_str().ok_or_else(|| {
                    IngestError::Schema(format!(
                        "Target for {}.{} must be a string",
                        kind, source
                    ))
                })?;
                mappings.push(FieldMapping::new(source.as_str(), target));
            }

            spec.insert(kind, mappings)?;
        }

        Ok(spec)
    }

    /// Add or replace the mapping for `kind`
    ///
    /// Target names must be unique within a kind.
    pub fn insert(&mut self, kind: Kind, mappings: Vec<FieldMapping>) -> IngestResult<()> {
        let mut seen = HashSet::new();
        for mapping in &mappings {
            if !seen.insert(mapping.target.as_str()) {
                return Err(IngestError::Schema(format!(
                    "Duplicate target field {} in {} mapping",
                    mapping.target, kind
                )));
            }
        }

        self.kinds.insert(kind, mappings);
        Ok(())
    }

    /// Ordered mappings for `kind`
    pub fn fields(&self, kind: Kind) -> IngestResult<&[FieldMapping]> {
        self.kinds
            .get(&kind)
            .map(Vec::as_slice)
            .ok_or_else(|| IngestError::Schema(format!("No mapping declared for kind {}", kind)))
    }

    /// Ordered target field names for `kind`
    pub fn targets(&self, kind: Kind) -> IngestResult<Vec<&str>> {
        Ok(self
            .fields(kind)?
            .iter()
            .map(|m| m.target.as_str())
            .collect())
    }

    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.kinds.keys().copied()
    }
}

// ============================================================================
// Coercion rules
// ============================================================================

/// Conversion applied to a non-null source value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionRule {
    Passthrough,
    Int,
    Float,
    /// Split on the given delimiter
    List(&'static str),
    YearEra,
    Gravity,
    /// Resolved through the cache instead of coerced
    Nested(NestedField),
}

impl CoercionRule {
    /// Apply a scalar rule; `Passthrough` and `Nested` return the value unchanged
    pub fn apply(&self, value: Value) -> Value {
        match self {
            CoercionRule::Passthrough | CoercionRule::Nested(_) => value,
            CoercionRule::Int => coerce_int(value),
            CoercionRule::Float => coerce_float(value),
            CoercionRule::List(delimiter) => coerce_list(value, delimiter),
            CoercionRule::YearEra => coerce_year_era(value),
            CoercionRule::Gravity => coerce_gravity(value),
        }
    }
}

/// `(kind, source field) → rule`; anything not listed is passthrough
pub const RULES: &[(Kind, &str, CoercionRule)] = &[
    (Kind::Person, "height", CoercionRule::Float),
    (Kind::Person, "mass", CoercionRule::Float),
    (Kind::Person, "birth_year", CoercionRule::YearEra),
    (Kind::Person, "homeworld", CoercionRule::Nested(NestedField::Homeworld)),
    (Kind::Person, "species", CoercionRule::Nested(NestedField::Species)),
    (Kind::Droid, "height", CoercionRule::Float),
    (Kind::Droid, "mass", CoercionRule::Float),
    (Kind::Droid, "create_year", CoercionRule::YearEra),
    (Kind::Droid, "equipment", CoercionRule::List("|")),
    (Kind::Droid, "instructions", CoercionRule::List(",")),
    (Kind::Droid, "homeworld", CoercionRule::Nested(NestedField::Homeworld)),
    (Kind::Planet, "suns", CoercionRule::Int),
    (Kind::Planet, "moons", CoercionRule::Int),
    (Kind::Planet, "diameter", CoercionRule::Int),
    (Kind::Planet, "population", CoercionRule::Int),
    (Kind::Planet, "orbital_period", CoercionRule::Float),
    (Kind::Planet, "rotation_period", CoercionRule::Float),
    (Kind::Planet, "gravity", CoercionRule::Gravity),
    (Kind::Planet, "climate", CoercionRule::List(", ")),
    (Kind::Planet, "terrain", CoercionRule::List(", ")),
    (Kind::Starship, "length", CoercionRule::Float),
    (Kind::Starship, "hyperdrive_rating", CoercionRule::Float),
    (Kind::Starship, "MGLT", CoercionRule::Int),
    (Kind::Starship, "max_atmosphering_speed", CoercionRule::Int),
    (Kind::Starship, "crew", CoercionRule::Int),
    (Kind::Starship, "passengers", CoercionRule::Int),
    (Kind::Starship, "cargo_capacity", CoercionRule::Int),
    (Kind::Starship, "armament", CoercionRule::List(",")),
];

pub fn rule_for(kind: Kind, source: &str) -> CoercionRule {
    RULES
        .iter()
        .find(|(k, field, _)| *k == kind && *field == source)
        .map(|(_, _, rule)| *rule)
        .unwrap_or(CoercionRule::Passthrough)
}
