//! Geocoding service configuration.
//!
//! The default service is defined in `services/nominatim.toml` and embedded
//! at compile time. A different file can be supplied at runtime with
//! [`load_service`].

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors from loading a service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML is malformed or missing fields.
    #[error("invalid service config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// API base URL without the endpoint path.
    pub base_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Maximum suggestions per forward lookup.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// ISO 3166-1 alpha-2 codes to bias results to. Empty means worldwide.
    #[serde(default)]
    pub country_codes: Vec<String>,
}

const fn default_limit() -> u32 {
    5
}

const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// Returns the embedded default service.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the embedded file is malformed.
pub fn default_service() -> Result<GeocodingService, ConfigError> {
    parse_service(NOMINATIM_TOML)
}

/// Parses a service definition from a TOML string.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] on malformed input.
pub fn parse_service(toml_str: &str) -> Result<GeocodingService, ConfigError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Reads a service definition from `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_service(path: &Path) -> Result<GeocodingService, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_service(&contents)
}
