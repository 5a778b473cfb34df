use std::time::Duration;

use serde::Deserialize;

use crate::dataverse::resource::ResourceKey;
use crate::errors::ConfigError;
use crate::utils::constants::{
    DEFAULT_API_VERSION, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_TOKEN_CACHE_TTL_SECS,
    SETTING_ENVIRONMENT_URL,
};

/// ================================
/// Settings file (settings.local.json)
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotSettings {
    /// Base url of the Dataverse environment, e.g. `https://org.crm.dynamics.com`
    pub dataverse_environment_url: Option<String>,
    pub api_version: Option<String>,
    /// Lifetime of a cached token, counted from when it was fetched
    pub token_cache_ttl_seconds: Option<u64>,
    pub http_timeout_ms: Option<u64>,
    pub logging: Option<LoggingConfig>,
}

impl SnapshotSettings {
    /// Validated environment url. Fails when it was never set.
    pub fn environment(&self) -> Result<ResourceKey, ConfigError> {
        match self.dataverse_environment_url.as_deref() {
            Some(url) if !url.trim().is_empty() => ResourceKey::parse(url),
            _ => Err(ConfigError::MissingSetting(SETTING_ENVIRONMENT_URL)),
        }
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn token_cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.token_cache_ttl_seconds
                .unwrap_or(DEFAULT_TOKEN_CACHE_TTL_SECS),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS))
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}
