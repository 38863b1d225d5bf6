//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Public endpoint serving the Spanish Ministry fuel price listing
pub const DEFAULT_SOURCE_URL: &str =
    "https://sedeaplicaciones.minetur.gob.es/ServiciosRESTCarburantes/PreciosCarburantes/EstacionesTerrestres/";

/// Field-name presets understood by the record reader
pub const KNOWN_SCHEMAS: &[&str] = &["minetur", "canonical"];

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub source: SourceSection,

    #[serde(default)]
    pub search: SearchSection,

    #[serde(default)]
    pub retry: RetrySection,
}

impl ConfigSchema {
    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<()> {
        if !self.source.url.starts_with("http://") && !self.source.url.starts_with("https://") {
            return Err(Error::invalid_config_value(
                "source.url",
                "must start with http:// or https://",
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(Error::invalid_config_value("source.timeout_secs", "must be positive"));
        }
        if !KNOWN_SCHEMAS.contains(&self.source.schema.as_str()) {
            return Err(Error::invalid_config_value(
                "source.schema",
                format!("`{}` is not one of {:?}", self.source.schema, KNOWN_SCHEMAS),
            ));
        }
        if !self.search.radius_km.is_finite() || self.search.radius_km < 0.0 {
            return Err(Error::invalid_config_value(
                "search.radius_km",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Where station records come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSection {
    /// Listing endpoint
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Field-name preset, one of [`KNOWN_SCHEMAS`]
    #[serde(default = "default_schema")]
    pub schema: String,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            schema: default_schema(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_schema() -> String {
    "minetur".to_string()
}

/// Defaults for `list` when flags are omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Radius applied when a position is given without `--radius`
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Maximum rows printed
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            limit: default_limit(),
        }
    }
}

fn default_radius_km() -> f64 {
    10.0
}

fn default_limit() -> usize {
    20
}

/// Backoff for fetching the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySection {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    10_000
}
