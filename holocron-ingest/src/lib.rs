//! holocron-ingest library interface
//!
//! Fetches entities from the remote resource through a persistent cache,
//! enriches them from supplementary datasets, and maps them into normalized
//! entities:
//! - `cache`: read-through/write-through JSON cache with copy isolation
//! - `linker`: cross-source lookup and overlay
//! - `mapping` / `mapper`: kind-polymorphic field mapping and coercion
//! - `resolver`: homeworld and species expansion
//! - `boarding`: capacity-bounded crew and passenger assignment
//! - `pipeline`: search-enrich-map orchestration

pub mod boarding;
pub mod cache;
pub mod client;
pub mod datasets;
pub mod error;
pub mod linker;
pub mod mapper;
pub mod mapping;
pub mod pipeline;
pub mod resolver;
pub mod types;

pub use crate::boarding::{board, Ship};
pub use crate::cache::{cache_key, CacheStore};
pub use crate::client::{Resource, ResourceFetcher, SwapiClient};
pub use crate::datasets::{load_records, SupplementaryData};
pub use crate::error::{FetchError, IngestError, IngestResult};
pub use crate::mapper::{NestedResolver, SchemaMapper};
pub use crate::mapping::MappingSpec;
pub use crate::pipeline::IngestPipeline;
pub use crate::resolver::NestedEntityResolver;
pub use crate::types::{Kind, NestedField, NormalizedEntity, RawEntity};
