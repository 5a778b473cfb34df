//! Snapshot on record load, for hosts that already hold a user session.
//!
//! The host supplies the bearer token, so no credential or cache is
//! involved. The call is fire-and-forget: the outcome is only logged.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cache::provider::BearerTokenSource;
use crate::dataverse::action::AuditSpaceSnapshot;
use crate::dataverse::client::DataverseClient;
use crate::dataverse::resource::ResourceKey;
use crate::errors::{AuthenticationError, ExecuteError};

pub const FORM_EVENT_NAME: &str = "A Custom Snapshot From Form";

/// Token of the session the host already established.
#[derive(Clone)]
pub struct AmbientSession(String);

impl AmbientSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for AmbientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AmbientSession(<redacted>)")
    }
}

impl BearerTokenSource for AmbientSession {
    async fn bearer_token(&self, _resource: &ResourceKey) -> Result<String, AuthenticationError> {
        Ok(self.0.clone())
    }
}

/// The record currently loaded in a form.
#[derive(Debug, Clone)]
pub struct FormContext {
    /// Record id as the form reports it, braces included.
    pub entity_id: String,
    /// Table logical name, e.g. `contact`.
    pub entity_name: String,
}

/// Snapshot the loaded record in the background.
pub fn on_load<T>(client: Arc<DataverseClient<T>>, form: FormContext) -> JoinHandle<()>
where
    T: BearerTokenSource + 'static,
{
    tokio::spawn(async move {
        match snapshot(&client, &form).await {
            Ok(()) => info!("Success"),
            Err(err) => error!("{}", err),
        }
    })
}

async fn snapshot<T: BearerTokenSource>(
    client: &DataverseClient<T>,
    form: &FormContext,
) -> Result<(), ExecuteError> {
    let request = AuditSpaceSnapshot::new(FORM_EVENT_NAME, &form.entity_id, &form.entity_name)?;
    client.execute(&request).await
}
