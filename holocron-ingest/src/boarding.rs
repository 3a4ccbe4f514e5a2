//! Capacity-bounded crew and passenger assignment
//!
//! `board` pairs crew positions with crew members by index and seats
//! passengers in input order, never exceeding the ship's `crew_size` or
//! `max_passengers`. Anything beyond capacity is dropped, not rejected.

use crate::error::{IngestError, IngestResult};
use crate::types::NormalizedEntity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

pub const CREW_SIZE: &str = "crew_size";
pub const MAX_PASSENGERS: &str = "max_passengers";
pub const CREW_MEMBERS: &str = "crew_members";
pub const PASSENGERS_ON_BOARD: &str = "passengers_on_board";

/// A starship entity carrying crew and passenger assignments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ship(NormalizedEntity);

impl Ship {
    pub fn new(starship: NormalizedEntity) -> Self {
        Self(starship)
    }

    pub fn crew_size(&self) -> IngestResult<usize> {
        capacity(&self.0, CREW_SIZE)
    }

    pub fn max_passengers(&self) -> IngestResult<usize> {
        capacity(&self.0, MAX_PASSENGERS)
    }

    /// Position → crew member, if the ship has been boarded
    pub fn crew_members(&self) -> Option<&Map<String, Value>> {
        self.0.get(CREW_MEMBERS).and_then(Value::as_object)
    }

    pub fn passengers_on_board(&self) -> Option<&Vec<Value>> {
        self.0.get(PASSENGERS_ON_BOARD).and_then(Value::as_array)
    }

    pub fn as_entity(&self) -> &NormalizedEntity {
        &self.0
    }

    pub fn into_entity(self) -> NormalizedEntity {
        self.0
    }
}

impl From<NormalizedEntity> for Ship {
    fn from(starship: NormalizedEntity) -> Self {
        Self(starship)
    }
}

fn capacity(entity: &NormalizedEntity, field: &str) -> IngestResult<usize> {
    let value = entity.get(field).unwrap_or(&Value::Null);
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            IngestError::Contract(format!(
                "Ship {} must be a non-negative integer, got {}",
                field, value
            ))
        })
}

/// Assign crew and (optionally) passengers to `ship`
///
/// `crew_members` and `crew_positions` are parallel sequences and must have
/// the same length. Only the first `crew_size` pairs are kept. When
/// `passengers` is `Some`, the first `max_passengers` of them board in input
/// order; when `None`, `passengers_on_board` is left untouched.
///
/// Prior assignments are replaced, not extended. Positions must be distinct;
/// a repeated position is a contract error.
pub fn board<S: AsRef<str>>(
    ship: Ship,
    crew_members: &[NormalizedEntity],
    crew_positions: &[S],
    passengers: Option<&[NormalizedEntity]>,
) -> IngestResult<Ship> {
    if crew_members.len() != crew_positions.len() {
        return Err(IngestError::Contract(format!(
            "{} crew members supplied for {} crew positions",
            crew_members.len(),
            crew_positions.len()
        )));
    }

    let mut seen = HashSet::with_capacity(crew_positions.len());
    for position in crew_positions {
        let position = position.as_ref();
        if !seen.insert(position) {
            return Err(IngestError::Contract(format!(
                "Crew position {:?} assigned more than once",
                position
            )));
        }
    }

    let crew_size = ship.crew_size()?;
    let max_passengers = match passengers {
        Some(_) => Some(ship.max_passengers()?),
        None => None,
    };

    let crew: Map<String, Value> = crew_positions
        .iter()
        .zip(crew_members)
        .take(crew_size)
        .map(|(position, member)| (position.as_ref().to_string(), Value::Object(member.clone())))
        .collect();

    if crew_members.len() > crew_size {
        debug!(
            supplied = crew_members.len(),
            crew_size = crew_size,
            "Crew exceeds capacity; extra members dropped"
        );
    }

    let mut entity = ship.into_entity();
    entity.insert(CREW_MEMBERS.to_string(), Value::Object(crew));

    if let (Some(passengers), Some(max_passengers)) = (passengers, max_passengers) {
        if passengers.len() > max_passengers {
            debug!(
                supplied = passengers.len(),
                max_passengers = max_passengers,
                "Passengers exceed capacity; extra passengers dropped"
            );
        }

        let boarded = passengers
            .iter()
            .take(max_passengers)
            .map(|p| Value::Object(p.clone()))
            .collect();
        entity.insert(PASSENGERS_ON_BOARD.to_string(), Value::Array(boarded));
    }

    Ok(Ship(entity))
}
