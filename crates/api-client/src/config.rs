//! Configuration for the stations client
//!
//! Built from a `fuelscope.toml` [`SourceSection`] or from environment
//! variables, with builder-style overrides.

use crate::error::{ApiError, ApiResult};
use fuelscope_catalog::SchemaPreset;
use fuelscope_core::config::{ConfigSchema, DEFAULT_SOURCE_URL};
use fuelscope_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development against a mock or mirror
    Development,
    /// Staging mirror
    Staging,
    /// The public feed
    #[default]
    Production,
}

impl Environment {
    /// Parse an environment name; unknown names mean production
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Retry policy suited to this environment
    pub fn retry(self) -> RetryConfig {
        match self {
            Self::Development => RetryConfig::quick(),
            Self::Staging => RetryConfig::default(),
            Self::Production => RetryConfig::patient(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Listing endpoint
    pub url: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Field names of the listing entries
    pub schema: SchemaPreset,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            schema: SchemaPreset::default(),
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `FUELSCOPE_API_URL`: listing endpoint
    /// - `FUELSCOPE_TIMEOUT_SECS`: request timeout in seconds
    /// - `FUELSCOPE_ENV`: environment (development/staging/production)
    pub fn from_env() -> Self {
        Self::default().overlay(|key| env::var(key).ok())
    }

    /// Create configuration from a loaded config file
    pub fn from_file(schema: &ConfigSchema) -> ApiResult<Self> {
        let preset = SchemaPreset::from_name(&schema.source.schema).ok_or_else(|| {
            ApiError::config(format!("unknown schema preset `{}`", schema.source.schema))
        })?;

        Ok(Self {
            url: schema.source.url.clone(),
            timeout: Duration::from_secs(schema.source.timeout_secs),
            retry: RetryConfig::from_section(&schema.retry),
            schema: preset,
            environment: Environment::default(),
        })
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `FUELSCOPE_ENV` also selects the retry policy.
    #[must_use]
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(name) = lookup("FUELSCOPE_ENV") {
            self.environment = Environment::parse(&name);
            self.retry = self.environment.retry();
        }
        if let Some(url) = lookup("FUELSCOPE_API_URL") {
            self.url = url;
        }
        if let Some(secs) = lookup("FUELSCOPE_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Builder-style method to set the endpoint
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set the field-name preset
    #[must_use]
    pub fn with_schema(mut self, schema: SchemaPreset) -> Self {
        self.schema = schema;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.url.is_empty() {
            return Err(ApiError::config("url cannot be empty"));
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(self.url.clone()));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ApiError::config("retry.max_attempts cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.url.contains("minetur.gob.es"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.schema, SchemaPreset::Minetur);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlay_reads_variables() {
        let vars: HashMap<&str, &str> = [
            ("FUELSCOPE_API_URL", "http://localhost:8080/stations"),
            ("FUELSCOPE_TIMEOUT_SECS", "5"),
            ("FUELSCOPE_ENV", "dev"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default().overlay(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.url, "http://localhost:8080/stations");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.retry, RetryConfig::quick());
    }

    #[test]
    fn test_overlay_ignores_garbage_timeout() {
        let config = ClientConfig::default()
            .overlay(|k| (k == "FUELSCOPE_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_file() {
        let mut schema = ConfigSchema::default();
        schema.source.schema = "canonical".to_string();
        schema.source.timeout_secs = 12;
        schema.retry.max_attempts = 7;

        let config = ClientConfig::from_file(&schema).unwrap();
        assert_eq!(config.schema, SchemaPreset::Canonical);
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.retry.max_attempts, 7);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_url("https://mirror.example.org/listing")
            .with_timeout(Duration::from_secs(60))
            .with_retry(RetryConfig::no_retry());

        assert_eq!(config.url, "https://mirror.example.org/listing");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ClientConfig::default().with_url("file:///tmp/x").validate(),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(ClientConfig::default().with_url("").validate().is_err());
        assert!(ClientConfig::default().with_timeout(Duration::ZERO).validate().is_err());
    }
}
