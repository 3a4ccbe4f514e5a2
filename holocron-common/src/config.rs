//! Configuration loading and path resolution
//!
//! Bootstrap configuration comes from a TOML file. Every field has a built-in
//! default, so a missing file is never fatal.
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `HOLOCRON_CONFIG` environment variable
//! 3. `<config_dir>/holocron/config.toml`
//! 4. Compiled defaults (fallback)

use crate::coercion::NONE_VALUES;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "HOLOCRON_CONFIG";

/// Environment variable naming the cache file
pub const CACHE_ENV_VAR: &str = "HOLOCRON_CACHE";

/// Cache file used when nothing else is configured
pub const DEFAULT_CACHE_FILE: &str = "./CACHE.json";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the remote entity resource
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Cache document path (optional, see [`resolve_cache_path`])
    #[serde(default)]
    pub cache_path: Option<PathBuf>,

    /// Remote request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify the server's TLS certificate
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Strings normalized to null (case-insensitive, trimmed)
    #[serde(default = "default_none_values")]
    pub none_values: Vec<String>,

    /// Custom mapping document (optional, built-in mapping otherwise)
    #[serde(default)]
    pub mapping_path: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_path: None,
            timeout_secs: default_timeout_secs(),
            verify_tls: default_verify_tls(),
            none_values: default_none_values(),
            mapping_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "https://swapi.py4e.com/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_verify_tls() -> bool {
    true
}

fn default_none_values() -> Vec<String> {
    NONE_VALUES.iter().map(|s| s.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML config file
///
/// Unlike [`load_config`], a missing file is an error here.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Resolve and load configuration, falling back to defaults
///
/// A config file that cannot be found logs a warning and yields the compiled
/// defaults. A config file that exists but does not parse is an error.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!("Configuration loaded from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!(
                "Config file not found: {} (using built-in defaults)",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => Ok(TomlConfig::default()),
    }
}

/// Locate the config file following the documented priority order
///
/// Returns `None` only when no candidate path exists at all.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: platform config directory
    dirs::config_dir()
        .map(|d| d.join("holocron").join("config.toml"))
        .filter(|p| p.exists())
}

/// Resolve the cache document path
///
/// Priority: command-line argument → `HOLOCRON_CACHE` → TOML `cache_path` →
/// [`DEFAULT_CACHE_FILE`].
pub fn resolve_cache_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(CACHE_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.cache_path {
        return path.clone();
    }

    PathBuf::from(DEFAULT_CACHE_FILE)
}
