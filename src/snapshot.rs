//! Wiring used by the console binary: settings in, ready-to-use client out.

use reqwest::Client;

use crate::cache::provider::CachedTokenProvider;
use crate::cache::token_store::TokenStore;
use crate::config::settings::SnapshotSettings;
use crate::dataverse::action::AuditSpaceSnapshot;
use crate::dataverse::client::DataverseClient;
use crate::dataverse::resource::ResourceKey;
use crate::errors::{AuthenticationError, ExecuteError};
use crate::identity::TokenCredential;

pub const CONSOLE_EVENT_NAME: &str = "Snapshot from console app";
pub const SAMPLE_RECORD_ID: &str = "2b19f98a-dd81-f011-b4cc-000d3a59c9d6";
pub const SAMPLE_TABLE: &str = "contact";

pub fn http_client(settings: &SnapshotSettings) -> reqwest::Result<Client> {
    Client::builder().timeout(settings.http_timeout()).build()
}

/// Client for `environment` whose tokens come from `credential` through `store`.
pub fn connect<C, S>(
    http: &Client,
    settings: &SnapshotSettings,
    environment: ResourceKey,
    credential: C,
    store: S,
) -> DataverseClient<CachedTokenProvider<C, S>>
where
    C: TokenCredential<Error = AuthenticationError>,
    S: TokenStore,
{
    let provider = CachedTokenProvider::new(credential, store).with_ttl(settings.token_cache_ttl());
    DataverseClient::new(http, environment, provider).with_api_version(settings.api_version())
}

/// Validate the parameters and run `unl_AuditSpaceSnapshot` once.
pub async fn capture<C, S>(
    client: &DataverseClient<CachedTokenProvider<C, S>>,
    event_name: &str,
    record_id: &str,
    table_logical_name: &str,
) -> Result<AuditSpaceSnapshot, ExecuteError>
where
    C: TokenCredential<Error = AuthenticationError>,
    S: TokenStore,
{
    let request = AuditSpaceSnapshot::new(event_name, record_id, table_logical_name)?;
    client.execute(&request).await?;
    Ok(request)
}
