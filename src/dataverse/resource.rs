use std::fmt;

use reqwest::Url;

use crate::errors::ConfigError;
use crate::utils::constants::{DEFAULT_SCOPE_SUFFIX, SETTING_ENVIRONMENT_URL};

/// Base url of a Dataverse environment. Doubles as the token cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingSetting(SETTING_ENVIRONMENT_URL));
        }

        let invalid = |reason: String| ConfigError::InvalidUrl {
            key: SETTING_ENVIRONMENT_URL,
            value: value.to_owned(),
            reason,
        };
        let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_owned()));
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<resource>/.default`
    pub fn default_scope(&self) -> String {
        format!("{}{}", self.0, DEFAULT_SCOPE_SUFFIX)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
