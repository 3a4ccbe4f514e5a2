//! Supplementary datasets
//!
//! Locally sourced record tables that enrich or override remote records.
//! They are read-only and consumed through the linker.

use crate::types::RawEntity;
use holocron_common::{Error, Result};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Supplementary records grouped by the kind they enrich
#[derive(Debug, Clone, Default)]
pub struct SupplementaryData {
    pub people: Vec<RawEntity>,
    pub droids: Vec<RawEntity>,
    pub planets: Vec<RawEntity>,
    pub starships: Vec<RawEntity>,
}

/// Read a supplementary dataset, choosing the format by extension
///
/// `.csv` files are read as header-keyed rows; anything else must be a JSON
/// array of objects.
pub fn load_records(path: &Path) -> Result<Vec<RawEntity>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let records = if is_csv {
        load_csv_records(path)?
    } else {
        load_json_records(path)?
    };

    info!(
        path = %path.display(),
        records = records.len(),
        "Supplementary dataset loaded"
    );
    Ok(records)
}

/// Read a JSON array of objects
pub fn load_json_records(path: &Path) -> Result<Vec<RawEntity>> {
    let content = std::fs::read_to_string(path)?;
    into_records(serde_json::from_str(&content)?)
        .map_err(|message| Error::InvalidInput(format!("{}: {}", path.display(), message)))
}

/// Read a CSV file with a header row
///
/// Every row becomes a record keyed by header name with string values; typing
/// is left to the schema mapper. A leading byte-order mark is ignored.
pub fn load_csv_records(path: &Path) -> Result<Vec<RawEntity>> {
    let file = std::fs::File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(path, e))?;
        let record: RawEntity = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.clone(), Value::String(value.to_string())))
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// Convert a JSON array of objects into records
pub fn records_from_value(value: Value) -> Result<Vec<RawEntity>> {
    into_records(value).map_err(Error::InvalidInput)
}

fn into_records(value: Value) -> std::result::Result<Vec<RawEntity>, String> {
    let Value::Array(items) = value else {
        return Err("dataset must be a JSON array".to_string());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(format!("dataset entry {} is not an object: {}", index, other)),
        })
        .collect()
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    Error::InvalidInput(format!("{}: {}", path.display(), err))
}
