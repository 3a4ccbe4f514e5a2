//! Remote fetch collaborator
//!
//! `ResourceFetcher` is the seam between the cache and the network. The
//! production implementation, `SwapiClient`, issues blocking HTTP GETs with a
//! bounded timeout. Failures are returned immediately; there is no retry or
//! backoff.
//!
//! # API Reference
//! - Base URL: https://swapi.py4e.com/api
//! - Collection endpoints queried with `?search=` return an envelope whose
//!   `results` list holds the matches; entity URLs return the entity directly.

use crate::error::FetchError;
use holocron_common::config::TomlConfig;
use reqwest::blocking::Client;
use reqwest::header;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("holocron/", env!("CARGO_PKG_VERSION"));

/// Source of raw JSON resources
///
/// `query` holds optional query-string parameters; an empty slice means none.
pub trait ResourceFetcher {
    fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, FetchError>;
}

impl<T: ResourceFetcher + ?Sized> ResourceFetcher for &T {
    fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        (**self).fetch(endpoint, query)
    }
}

/// Resource collections exposed by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    People,
    Planets,
    Species,
    Starships,
}

impl Resource {
    fn path(&self) -> &'static str {
        match self {
            Resource::People => "people",
            Resource::Planets => "planets",
            Resource::Species => "species",
            Resource::Starships => "starships",
        }
    }
}

/// Collection URL under `base_url`, e.g. `https://swapi.py4e.com/api/people/`
pub fn resource_url(base_url: &str, resource: Resource) -> String {
    format!("{}/{}/", base_url.trim_end_matches('/'), resource.path())
}

/// Blocking HTTP client for the remote entity resource
pub struct SwapiClient {
    /// HTTP client for API requests
    http_client: Client,
    /// Base URL without trailing slash
    base_url: String,
}

impl SwapiClient {
    /// Create a client with an explicit timeout and TLS verification toggle
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        verify_tls: bool,
    ) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let http_client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_tls)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a client from bootstrap configuration
    pub fn from_config(config: &TomlConfig) -> Result<Self, FetchError> {
        Self::new(config.base_url.clone(), config.timeout(), config.verify_tls)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection URL, e.g. `https://swapi.py4e.com/api/people/`
    pub fn endpoint(&self, resource: Resource) -> String {
        resource_url(&self.base_url, resource)
    }
}

impl ResourceFetcher for SwapiClient {
    fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        debug!(url = %endpoint, params = query.len(), "GET remote resource");

        let mut request = self.http_client.get(endpoint);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .map_err(|e| transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: endpoint.to_string(),
                }
            } else {
                FetchError::Decode {
                    url: endpoint.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Unreachable {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Stub Fetcher for Testing
// ============================================================================
