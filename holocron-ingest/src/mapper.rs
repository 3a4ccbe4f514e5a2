//! Schema mapper
//!
//! Turns a [`RawEntity`] of any kind into a [`NormalizedEntity`] whose keys
//! are exactly the kind's declared target fields, in declared order.
//!
//! For each `(source, target)` pair:
//! 1. Look up the source value (`null` if absent)
//! 2. Replace sentinel strings with `null`
//! 3. If still non-null, apply the `(kind, source)` coercion rule, or hand
//!    nested references to the [`NestedResolver`]

use crate::error::IngestResult;
use crate::mapping::{rule_for, CoercionRule, MappingSpec};
use crate::types::{Kind, NestedField, NormalizedEntity, RawEntity};
use holocron_common::coercion::{normalize_none, NONE_VALUES};
use serde_json::{Map, Value};

/// Expands nested references (homeworld, species) during mapping
///
/// The mapper passes itself in so implementations can map the referenced
/// entity with the same mapping and sentinels.
pub trait NestedResolver {
    fn resolve_nested(
        &mut self,
        mapper: &SchemaMapper,
        field: NestedField,
        reference: Value,
    ) -> IngestResult<Value>;
}

/// Leaves nested references exactly as they appear in the source
pub struct DetachedReferences;

impl NestedResolver for DetachedReferences {
    fn resolve_nested(
        &mut self,
        _mapper: &SchemaMapper,
        _field: NestedField,
        reference: Value,
    ) -> IngestResult<Value> {
        Ok(reference)
    }
}

/// Kind-polymorphic field mapping and coercion engine
#[derive(Debug, Clone)]
pub struct SchemaMapper {
    spec: MappingSpec,
    sentinels: Vec<String>,
}

impl SchemaMapper {
    pub fn new(spec: MappingSpec, sentinels: Vec<String>) -> Self {
        Self { spec, sentinels }
    }

    /// Mapper using the default none-values (`""`, `n/a`, `none`, `unknown`)
    pub fn with_default_sentinels(spec: MappingSpec) -> Self {
        Self::new(spec, NONE_VALUES.iter().map(|s| s.to_string()).collect())
    }

    pub fn spec(&self) -> &MappingSpec {
        &self.spec
    }

    pub fn sentinels(&self) -> &[String] {
        &self.sentinels
    }

    /// Map `raw` as `kind`, delegating nested fields to `nested`
    ///
    /// Fails with a schema error if `kind` has no mapping. Errors raised by
    /// `nested` propagate unchanged.
    pub fn transform(
        &self,
        raw: &RawEntity,
        kind: Kind,
        nested: &mut dyn NestedResolver,
    ) -> IngestResult<NormalizedEntity> {
        let fields = self.spec.fields(kind)?;
        let mut entity = Map::with_capacity(fields.len());

        for mapping in fields {
            let value = raw.get(&mapping.source).cloned().unwrap_or(Value::Null);
            let value = normalize_none(value, &self.sentinels);

            let value = if value.is_null() {
                value
            } else {
                match rule_for(kind, &mapping.source) {
                    CoercionRule::Nested(field) => nested.resolve_nested(self, field, value)?,
                    rule => rule.apply(value),
                }
            };

            entity.insert(mapping.target.clone(), value);
        }

        Ok(entity)
    }

    /// Map `raw` as `kind` without expanding nested references
    pub fn transform_flat(&self, raw: &RawEntity, kind: Kind) -> IngestResult<NormalizedEntity> {
        self.transform(raw, kind, &mut DetachedReferences)
    }
}
