//! Core types shared across the ingest pipeline

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Kind-agnostic record as received from a source, before mapping
pub type RawEntity = Map<String, Value>;

/// Output of the schema mapper
///
/// Keys are exactly the mapping's target fields, in declared order.
pub type NormalizedEntity = Map<String, Value>;

/// Entity kind; selects which mapping entry applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Person,
    Droid,
    Planet,
    Starship,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Person, Kind::Droid, Kind::Planet, Kind::Starship];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Person => "person",
            Kind::Droid => "droid",
            Kind::Planet => "planet",
            Kind::Starship => "starship",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| IngestError::Schema(format!("Unknown entity kind: {}", s)))
    }
}

/// Fields that are resolved through the cache rather than scalar-coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedField {
    /// Planet reference, expanded into a nested planet entity
    Homeworld,
    /// Species reference list, reduced to the first species' name
    Species,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_schema_error() {
        let result = "wookiee".parse::<Kind>();
        assert!(matches!(result, Err(IngestError::Schema(_))));
    }
}
