use std::path::Path;

use tracing::info;

use crate::config::proc_loader::file_to_settings;
use crate::config::settings::SnapshotSettings;
use crate::dataverse::resource::ResourceKey;
use crate::errors::ConfigError;

/// Load settings and apply a command line / environment override of the url.
///
/// Fails before anything touches the network when no environment url ends
/// up configured.
pub async fn run(
    config_path: &str,
    environment_url: Option<String>,
) -> Result<(SnapshotSettings, ResourceKey), ConfigError> {
    let mut settings = file_to_settings(Path::new(config_path)).await?;
    if let Some(url) = environment_url.filter(|u| !u.trim().is_empty()) {
        info!("environment url overridden from command line");
        settings.dataverse_environment_url = Some(url);
    }
    let environment = settings.environment()?;
    Ok((settings, environment))
}
