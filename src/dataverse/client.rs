use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::cache::provider::BearerTokenSource;
use crate::dataverse::action::UnboundAction;
use crate::dataverse::resource::ResourceKey;
use crate::errors::{ExecuteError, InvocationError};
use crate::utils::constants::DEFAULT_API_VERSION;

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    error: ODataError,
}

#[derive(Debug, Deserialize)]
struct ODataError {
    code: Option<String>,
    message: String,
}

/// Calls custom actions on one Dataverse environment through the Web API.
#[derive(Debug, Clone)]
pub struct DataverseClient<T> {
    http: Client,
    resource: ResourceKey,
    api_version: String,
    tokens: T,
}

impl<T: BearerTokenSource> DataverseClient<T> {
    pub fn new(http: &Client, resource: ResourceKey, tokens: T) -> Self {
        Self {
            http: http.clone(),
            resource,
            api_version: DEFAULT_API_VERSION.to_owned(),
            tokens,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn resource(&self) -> &ResourceKey {
        &self.resource
    }

    pub fn action_url(&self, operation: &str) -> String {
        format!(
            "{}/api/data/v{}/{}",
            self.resource, self.api_version, operation
        )
    }

    /// Invoke `action` with a bearer token for this environment.
    ///
    /// Only success or failure is reported; any response payload is ignored.
    pub async fn execute<A: UnboundAction>(&self, action: &A) -> Result<(), ExecuteError> {
        let token = self.tokens.bearer_token(&self.resource).await?;

        let url = self.action_url(A::OPERATION);
        info!("invoking {} on {}", A::OPERATION, self.resource);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0")
            .json(action)
            .send()
            .await
            .map_err(InvocationError::Transport)?;

        let status = response.status();
        if status.is_success() {
            debug!("{} completed with {}", A::OPERATION, status);
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(InvocationError::Transport)?;
        Err(rejected(status, &body).into())
    }
}

fn rejected(status: StatusCode, body: &str) -> InvocationError {
    match serde_json::from_str::<ODataErrorBody>(body) {
        Ok(ODataErrorBody { error }) => InvocationError::Rejected {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
        },
        Err(_) => InvocationError::Rejected {
            status: status.as_u16(),
            code: None,
            message: if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_owned()
            },
        },
    }
}
