use std::env;
use std::fmt;

use reqwest::Client;
use tracing::debug;

use crate::cache::token::AccessToken;
use crate::errors::AuthenticationError;
use crate::identity::response::read_token_response;
use crate::identity::TokenCredential;
use crate::utils::constants::{
    AUTHORITY_HOST_DEFAULT, ENV_AUTHORITY_HOST, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_TENANT_ID,
};

pub const CREDENTIAL_NAME: &str = "ClientSecretCredential";

/// OAuth2 client credentials grant against the tenant's v2.0 token endpoint.
#[derive(Clone)]
pub struct ClientSecretCredential {
    pub tenant_id: String,
    pub client_id: String,
    client_secret: String,
    pub authority_host: String,
    client: Client,
}

impl ClientSecretCredential {
    pub fn new(
        client: &Client,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority_host: AUTHORITY_HOST_DEFAULT.to_owned(),
            client: client.clone(),
        }
    }

    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = authority_host.into();
        self
    }

    /// `None` unless tenant, client id and secret are all set.
    pub fn from_env(client: &Client) -> Option<Self> {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        let credential = Self::new(
            client,
            non_empty(ENV_TENANT_ID)?,
            non_empty(ENV_CLIENT_ID)?,
            non_empty(ENV_CLIENT_SECRET)?,
        );
        Some(match non_empty(ENV_AUTHORITY_HOST) {
            Some(host) => credential.with_authority_host(host),
            None => credential,
        })
    }

    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("authority_host", &self.authority_host)
            .finish_non_exhaustive()
    }
}

impl TokenCredential for ClientSecretCredential {
    type Error = AuthenticationError;

    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, AuthenticationError> {
        if scopes.is_empty() {
            return Err(AuthenticationError::InvalidScope(
                "at least one scope is required".to_owned(),
            ));
        }

        let scope = scopes.join(" ");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let url = self.token_endpoint();
        debug!("requesting client credentials token from {}", url);
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(AuthenticationError::Transport)?;

        read_token_response(response).await
    }
}
