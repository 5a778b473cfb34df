use anyhow::Result;
use auditspace_snapshot::cache::token_store::MemoryTokenStore;
use auditspace_snapshot::dataverse::action::AUDIT_SPACE_SNAPSHOT;
use auditspace_snapshot::identity::DefaultCredential;
use auditspace_snapshot::snapshot::{self, CONSOLE_EVENT_NAME, SAMPLE_RECORD_ID, SAMPLE_TABLE};
use auditspace_snapshot::utils::config_loader;
use auditspace_snapshot::utils::constants::SETTINGS_FILE_DEFAULT;
use auditspace_snapshot::utils::logging::{self, LogLevel};
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "SNAPSHOT_CONFIG", default_value = SETTINGS_FILE_DEFAULT)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Overrides DataverseEnvironmentUrl from the settings file
    #[arg(long, env = "DATAVERSE_ENVIRONMENT_URL")]
    environment_url: Option<String>,
    /// Record to snapshot, with or without braces
    #[arg(long, default_value = SAMPLE_RECORD_ID)]
    record_id: String,
    /// Logical name of the record's table
    #[arg(long, default_value = SAMPLE_TABLE)]
    table: String,
    #[arg(long, default_value = CONSOLE_EVENT_NAME)]
    event_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Settings: fail before any network activity
    // -------------------------------

    let args = Args::parse();
    let (settings, environment) =
        config_loader::run(&args.config, args.environment_url.clone()).await?;
    logging::run(&settings, args.log_level);

    // -------------------------------
    // 2. Credential chain, shared token cache, Web API client
    // -------------------------------

    let http = snapshot::http_client(&settings)?;
    let credential = DefaultCredential::from_env(&http);
    let store = MemoryTokenStore::shared().await;
    let client = snapshot::connect(&http, &settings, environment, credential, store);

    // -------------------------------
    // 3. Invoke the custom action
    // -------------------------------

    info!("Calling {}", AUDIT_SPACE_SNAPSHOT);
    let request = snapshot::capture(&client, &args.event_name, &args.record_id, &args.table).await?;
    info!(
        "snapshot requested for {} {}",
        request.table_logical_name, request.record_id
    );

    Ok(())
}
