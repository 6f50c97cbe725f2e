//! `AppConfig` struct, TOML read/write and environment overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cinescope_api::cache::CacheConfig;
use cinescope_api::rate_limiter::RateLimitConfig;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable overriding `[catalog].api_key`.
pub const CATALOG_API_KEY_ENV: &str = "CINESCOPE_CATALOG_API_KEY";

/// Environment variable overriding `[enrichment].api_key`.
pub const ENRICHMENT_API_KEY_ENV: &str = "CINESCOPE_ENRICHMENT_API_KEY";

/// Environment variable overriding `[cache].duration_ms`.
pub const CACHE_DURATION_ENV: &str = "CINESCOPE_CACHE_DURATION_MS";

/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog service settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Enrichment service settings.
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Per-service request quotas.
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    /// HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Catalog service configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,
    /// Image base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<Url>,
}

/// Enrichment service configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EnrichmentConfig {
    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,
}

/// `[rate_limit.*]` tables.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitSection {
    /// Catalog quota (default: 40 per 10 s).
    #[serde(default = "default_catalog_quota")]
    pub catalog: RateLimitConfig,
    /// Enrichment quota (default: 1000 per day).
    #[serde(default = "default_enrichment_quota")]
    pub enrichment: RateLimitConfig,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            catalog: default_catalog_quota(),
            enrichment: default_enrichment_quota(),
        }
    }
}

const fn default_catalog_quota() -> RateLimitConfig {
    RateLimitConfig::new(40, Duration::from_secs(10))
}

const fn default_enrichment_quota() -> RateLimitConfig {
    RateLimitConfig::new(1_000, Duration::from_secs(86_400))
}

/// HTTP configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl HttpConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Applies `CINESCOPE_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache duration override is not an integer.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(CATALOG_API_KEY_ENV) {
            self.catalog.api_key = Some(key);
        }
        if let Some(key) = lookup(ENRICHMENT_API_KEY_ENV) {
            self.enrichment.api_key = Some(key);
        }
        if let Some(ms) = lookup(CACHE_DURATION_ENV) {
            self.cache.duration_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("{CACHE_DURATION_ENV} must be milliseconds: {ms}"))?;
        }
        Ok(())
    }

    /// Catalog API key.
    ///
    /// # Errors
    ///
    /// Returns an error if no non-empty key is configured.
    pub fn catalog_api_key(&self) -> Result<&str> {
        self.catalog
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .with_context(|| {
                format!("catalog API key is required: set [catalog].api_key or {CATALOG_API_KEY_ENV}")
            })
    }

    /// Enrichment API key.
    ///
    /// # Errors
    ///
    /// Returns an error if no non-empty key is configured.
    pub fn enrichment_api_key(&self) -> Result<&str> {
        self.enrichment
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .with_context(|| {
                format!(
                    "enrichment API key is required: set [enrichment].api_key or {ENRICHMENT_API_KEY_ENV}"
                )
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (String::from(*k), String::from(*v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.catalog.api_key.is_none());
        assert_eq!(config.cache.duration_ms, 300_000);
        assert_eq!(config.cache.max_size, 100);
        assert_eq!(config.rate_limit.catalog.requests, 40);
        assert_eq!(config.rate_limit.enrichment.window_ms, 86_400_000);
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.catalog.api_key = Some(String::from("catalog-key"));
        config.catalog.base_url = Some(Url::parse("http://localhost:8080/3/").unwrap());
        config.cache.max_size = 10;

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[catalog]\napi_key = \"abc\"\n\n[rate_limit.catalog]\nrequests = 5\nwindow_ms = 1000\n",
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.catalog_api_key().unwrap(), "abc");
        assert_eq!(config.rate_limit.catalog.requests, 5);
        assert_eq!(config.rate_limit.enrichment.requests, 1_000);
        assert_eq!(config.http.timeout_ms, 10_000);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        // Arrange
        let mut config = AppConfig::default();
        config.catalog.api_key = Some(String::from("from-file"));

        // Act
        config
            .apply_env(env(&[
                (CATALOG_API_KEY_ENV, "from-env"),
                (ENRICHMENT_API_KEY_ENV, "omdb"),
                (CACHE_DURATION_ENV, "1000"),
            ]))
            .unwrap();

        // Assert
        assert_eq!(config.catalog_api_key().unwrap(), "from-env");
        assert_eq!(config.enrichment_api_key().unwrap(), "omdb");
        assert_eq!(config.cache.duration_ms, 1_000);
    }

    #[test]
    fn test_invalid_cache_duration_env_fails() {
        // Arrange
        let mut config = AppConfig::default();

        // Act
        let result = config.apply_env(env(&[(CACHE_DURATION_ENV, "soon")]));

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_api_key_is_error() {
        // Arrange
        let mut config = AppConfig::default();
        config.enrichment.api_key = Some(String::new());

        // Act
        let catalog = config.catalog_api_key();
        let enrichment = config.enrichment_api_key();

        // Assert
        assert!(
            catalog
                .unwrap_err()
                .to_string()
                .contains(CATALOG_API_KEY_ENV)
        );
        assert!(enrichment.is_err());
    }
}
