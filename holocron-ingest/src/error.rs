//! Error types for holocron-ingest
//!
//! Fetch and schema failures are fatal for the current pipeline step and are
//! propagated to the caller unchanged. Value coercion never produces an error.

use thiserror::Error;

/// Remote fetch failure
///
/// No retry is attempted for any variant.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Transport-level failure (DNS, connect, TLS, reset)
    #[error("Remote resource unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    /// Server answered with a non-success status
    #[error("Remote resource {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Response body was not valid JSON
    #[error("Response from {url} could not be decoded: {message}")]
    Decode { url: String, message: String },
}

/// Pipeline error type
#[derive(Debug, Error)]
pub enum IngestError {
    /// Remote resource could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Unknown kind or malformed mapping document
    #[error("Schema error: {0}")]
    Schema(String),

    /// Caller violated an operation's precondition
    #[error("Contract error: {0}")]
    Contract(String),

    /// A search returned no matching entity
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cache or dataset file could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(#[from] holocron_common::Error),
}

/// Result type for pipeline operations
pub type IngestResult<T> = Result<T, IngestError>;
