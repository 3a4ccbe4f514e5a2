//! # Holocron Common Library
//!
//! Shared code for the Holocron ingest crates:
//! - Error type
//! - TOML configuration loading and path resolution
//! - Value coercion and sentinel (none-value) normalization

pub mod coercion;
pub mod config;
pub mod error;

pub use coercion::{Era, YearEra, NONE_VALUES};
pub use error::{Error, Result};
