use std::env;

use reqwest::Client;
use tracing::debug;

use crate::cache::token::AccessToken;
use crate::errors::AuthenticationError;
use crate::identity::response::read_token_response;
use crate::identity::TokenCredential;
use crate::utils::constants::{
    APP_SERVICE_API_VERSION, DEFAULT_SCOPE_SUFFIX, ENV_CLIENT_ID, ENV_IDENTITY_ENDPOINT,
    ENV_IDENTITY_HEADER, IMDS_API_VERSION, IMDS_TOKEN_ENDPOINT,
};

pub const CREDENTIAL_NAME: &str = "ManagedIdentityCredential";

#[derive(Debug, Clone)]
pub enum ManagedIdentityEndpoint {
    /// Instance metadata service reachable from VMs and containers.
    Imds { url: String },
    /// Local endpoint injected into App Service and Functions hosts.
    AppService { url: String, secret: String },
}

/// Token from the identity assigned to the hosting compute resource.
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    pub endpoint: ManagedIdentityEndpoint,
    /// User-assigned identity; system-assigned when absent.
    pub client_id: Option<String>,
    client: Client,
}

impl ManagedIdentityCredential {
    pub fn new(client: &Client, endpoint: ManagedIdentityEndpoint) -> Self {
        Self {
            endpoint,
            client_id: None,
            client: client.clone(),
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn from_env(client: &Client) -> Self {
        let endpoint = match (env::var(ENV_IDENTITY_ENDPOINT), env::var(ENV_IDENTITY_HEADER)) {
            (Ok(url), Ok(secret)) if !url.is_empty() && !secret.is_empty() => {
                ManagedIdentityEndpoint::AppService { url, secret }
            }
            _ => ManagedIdentityEndpoint::Imds {
                url: IMDS_TOKEN_ENDPOINT.to_owned(),
            },
        };
        let credential = Self::new(client, endpoint);
        match env::var(ENV_CLIENT_ID).ok().filter(|v| !v.is_empty()) {
            Some(client_id) => credential.with_client_id(client_id),
            None => credential,
        }
    }
}

/// Managed identity endpoints take a resource, not a scope.
fn scope_to_resource(scopes: &[&str]) -> Result<String, AuthenticationError> {
    match scopes {
        [scope] => Ok(scope
            .strip_suffix(DEFAULT_SCOPE_SUFFIX)
            .unwrap_or(scope)
            .to_owned()),
        _ => Err(AuthenticationError::InvalidScope(format!(
            "managed identity requires exactly one scope, got {}",
            scopes.len()
        ))),
    }
}

impl TokenCredential for ManagedIdentityCredential {
    type Error = AuthenticationError;

    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, AuthenticationError> {
        let resource = scope_to_resource(scopes)?;

        let mut query = vec![("resource", resource.as_str())];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }

        let request = match &self.endpoint {
            ManagedIdentityEndpoint::Imds { url } => {
                query.push(("api-version", IMDS_API_VERSION));
                self.client.get(url).header("Metadata", "true")
            }
            ManagedIdentityEndpoint::AppService { url, secret } => {
                query.push(("api-version", APP_SERVICE_API_VERSION));
                self.client
                    .get(url)
                    .header("X-IDENTITY-HEADER", secret.as_str())
            }
        };

        debug!("requesting managed identity token for {}", resource);
        let response = request
            .query(&query)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() || err.is_timeout() {
                    AuthenticationError::Unavailable {
                        credential: CREDENTIAL_NAME,
                        reason: format!("endpoint not reachable: {err}"),
                    }
                } else {
                    AuthenticationError::Transport(err)
                }
            })?;

        // IMDS answers 400 when no identity is assigned to the host
        if matches!(self.endpoint, ManagedIdentityEndpoint::Imds { .. })
            && response.status().as_u16() == 400
        {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthenticationError::Unavailable {
                credential: CREDENTIAL_NAME,
                reason: format!("no identity assigned: {}", body.trim()),
            });
        }

        read_token_response(response).await
    }
}
