//! Read-through, write-through resource cache
//!
//! Entries are keyed by a signature of the endpoint and its query parameters
//! (parameter order does not matter). A hit returns an owned clone of the
//! stored value; a miss fetches through the [`ResourceFetcher`], stores a
//! clone, rewrites the whole cache document and hands back the fetched value.
//! No caller ever holds a reference into the stored entries, so mutating a
//! returned value cannot affect the cache or any other returned value.
//!
//! # Persistence
//! The document is a single JSON object mapping signature → value. It is read
//! wholesale by [`CacheStore::load`] and rewritten wholesale after every miss,
//! so each miss costs O(total cache size).
//!
//! The store assumes a single writer. Two processes sharing one document can
//! silently lose each other's entries.

use crate::client::ResourceFetcher;
use crate::error::IngestResult;
use holocron_common::Error;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use urlencoding::encode;

/// Deterministic cache signature for an endpoint and its query parameters
///
/// Parameters are sorted, so `[("a", "1"), ("b", "2")]` and
/// `[("b", "2"), ("a", "1")]` produce the same key. An empty query is the
/// same as no query. Keys and values are percent-encoded before joining, so
/// `=` or `&` inside a value cannot collide with another query. The whole key
/// is lower-cased.
pub fn cache_key(endpoint: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return endpoint.to_lowercase();
    }

    let mut pairs = query.to_vec();
    pairs.sort_unstable();
    let params = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", endpoint, params).to_lowercase()
}

/// Persistence-backed cache over a remote fetch collaborator
pub struct CacheStore<F> {
    /// Cache document location
    path: PathBuf,
    /// Signature → cached value
    entries: Map<String, Value>,
    /// Remote fetch collaborator
    fetcher: F,
}

impl<F: ResourceFetcher> CacheStore<F> {
    /// Load the cache document at `path`
    ///
    /// A missing file yields an empty cache. A file that is not a JSON object
    /// is an error.
    pub fn load(path: impl Into<PathBuf>, fetcher: F) -> IngestResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(Error::from)?;
            match serde_json::from_str::<Value>(&content).map_err(Error::from)? {
                Value::Object(entries) => entries,
                _ => {
                    return Err(Error::InvalidInput(format!(
                        "Cache document {} is not a JSON object",
                        path.display()
                    ))
                    .into())
                }
            }
        } else {
            Map::new()
        };

        info!(
            path = %path.display(),
            entries = entries.len(),
            "Cache loaded"
        );

        Ok(Self {
            path,
            entries,
            fetcher,
        })
    }

    /// Resolve a resource through the cache
    ///
    /// At most one remote fetch is made per unique signature for the lifetime
    /// of this store. Fetch and persistence failures propagate without retry
    /// and leave both the in-memory cache and the document untouched.
    pub fn resolve(&mut self, endpoint: &str, query: &[(&str, &str)]) -> IngestResult<Value> {
        let key = cache_key(endpoint, query);

        if let Some(value) = self.entries.get(&key) {
            debug!(key = %key, "Cache hit");
            return Ok(value.clone());
        }

        let resource = self.fetcher.fetch(endpoint, query)?;
        self.entries.insert(key.clone(), resource.clone());
        if let Err(e) = self.flush() {
            // The new entry is last, so removing it restores the prior order
            self.entries.remove(&key);
            warn!(key = %key, error = %e, "Cache document write failed; entry discarded");
            return Err(e);
        }

        info!(key = %key, entries = self.entries.len(), "Cache miss stored");
        Ok(resource)
    }

    /// Rewrite the whole cache document
    pub fn flush(&self) -> IngestResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(Error::from)?;
            }
        }

        let document = serde_json::to_string_pretty(&self.entries).map_err(Error::from)?;
        std::fs::write(&self.path, document).map_err(Error::from)?;
        Ok(())
    }

    pub fn contains(&self, endpoint: &str, query: &[(&str, &str)]) -> bool {
        self.entries.contains_key(&cache_key(endpoint, query))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
