//! Cross-source record linkage
//!
//! Collections are small (hundreds of records), so lookups are linear scans
//! with no index.

use serde_json::{Map, Value};
use tracing::debug;

/// First record whose `field` equals `value`, or `None`
///
/// Equality is exact JSON equality: `"12120"` does not match `12120`.
pub fn lookup_first<'a>(
    collection: &'a [Map<String, Value>],
    field: &str,
    value: &Value,
) -> Option<&'a Map<String, Value>> {
    collection
        .iter()
        .find(|record| record.get(field) == Some(value))
}

/// [`lookup_first`] for the common case of a string key such as `name`
pub fn lookup_first_str<'a>(
    collection: &'a [Map<String, Value>],
    field: &str,
    value: &str,
) -> Option<&'a Map<String, Value>> {
    collection
        .iter()
        .find(|record| record.get(field).and_then(Value::as_str) == Some(value))
}

/// Overlay every field of `supplementary` onto `primary`
///
/// Shared keys take the supplementary value; keys only in `primary` are kept.
pub fn overlay(primary: &mut Map<String, Value>, supplementary: &Map<String, Value>) {
    for (key, value) in supplementary {
        primary.insert(key.clone(), value.clone());
    }
}

/// Link `primary` to a supplementary record by `field` and overlay it
///
/// Returns `true` if a supplementary record was found and merged.
pub fn link_and_overlay(
    primary: &mut Map<String, Value>,
    dataset: &[Map<String, Value>],
    field: &str,
) -> bool {
    let Some(key) = primary.get(field).cloned() else {
        return false;
    };

    match lookup_first(dataset, field, &key) {
        Some(supplementary) => {
            debug!(field = field, value = %key, "Merging supplementary record");
            overlay(primary, supplementary);
            true
        }
        None => false,
    }
}
