//! Common error types for Holocron

use thiserror::Error;

/// Common result type for Holocron operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the Holocron crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input document has the wrong shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
