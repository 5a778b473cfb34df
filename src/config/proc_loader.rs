use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::settings::{LoggingConfig, SnapshotSettings};
use crate::errors::ConfigError;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("env placeholder pattern")
});

/// Load settings from a JSON (or YAML) file
pub async fn file_to_settings(path: &Path) -> Result<SnapshotSettings, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let expanded = expand_env_vars(&content);
    parse_settings(&expanded)
}

/// JSON is valid YAML, so one parser covers both file flavours.
pub fn parse_settings(content: &str) -> Result<SnapshotSettings, ConfigError> {
    let mut settings: SnapshotSettings = serde_yaml::from_str(content)?;

    // Apply defaults
    if settings.logging.is_none() {
        settings.logging = Some(LoggingConfig::default());
    }
    debug!("settings parsed");

    Ok(settings)
}

/// Replace `${VAR}` and `${VAR:default}` with values from the environment.
pub fn expand_env_vars(input: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string()
}
