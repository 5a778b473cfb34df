//! Identity backends able to mint bearer tokens for a set of scopes.
//!
//! [`DefaultCredential`] walks the ambient credential sources in order:
//! client secret from the environment, then managed identity.

use std::future::Future;

use reqwest::Client;
use tracing::{debug, warn};

use crate::cache::token::AccessToken;
use crate::errors::AuthenticationError;

pub mod client_secret;
pub mod managed_identity;
pub mod response;

use client_secret::ClientSecretCredential;
use managed_identity::ManagedIdentityCredential;

pub trait TokenCredential: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get_token(
        &self,
        scopes: &[&str],
    ) -> impl Future<Output = Result<AccessToken, Self::Error>> + Send;
}

#[derive(Debug, Clone)]
pub enum CredentialKind {
    ClientSecret(ClientSecretCredential),
    ManagedIdentity(ManagedIdentityCredential),
}

impl CredentialKind {
    pub fn name(&self) -> &'static str {
        match self {
            CredentialKind::ClientSecret(_) => client_secret::CREDENTIAL_NAME,
            CredentialKind::ManagedIdentity(_) => managed_identity::CREDENTIAL_NAME,
        }
    }

    pub async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, AuthenticationError> {
        match self {
            CredentialKind::ClientSecret(c) => c.get_token(scopes).await,
            CredentialKind::ManagedIdentity(c) => c.get_token(scopes).await,
        }
    }
}

/// Ordered chain of ambient credentials.
///
/// An unavailable source hands over to the next one. Any other failure ends
/// the chain and is returned as is.
#[derive(Debug, Clone)]
pub struct DefaultCredential {
    sources: Vec<CredentialKind>,
}

impl DefaultCredential {
    pub fn new(sources: Vec<CredentialKind>) -> Self {
        Self { sources }
    }

    /// Chain built from the process environment.
    pub fn from_env(client: &Client) -> Self {
        let mut sources = Vec::with_capacity(2);
        match ClientSecretCredential::from_env(client) {
            Some(credential) => sources.push(CredentialKind::ClientSecret(credential)),
            None => debug!("{} not configured, skipping", client_secret::CREDENTIAL_NAME),
        }
        sources.push(CredentialKind::ManagedIdentity(
            ManagedIdentityCredential::from_env(client),
        ));
        Self::new(sources)
    }

    pub fn sources(&self) -> &[CredentialKind] {
        &self.sources
    }
}

impl TokenCredential for DefaultCredential {
    type Error = AuthenticationError;

    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, AuthenticationError> {
        let mut unavailable = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.get_token(scopes).await {
                Ok(token) => {
                    debug!("token issued by {}", source.name());
                    return Ok(token);
                }
                Err(AuthenticationError::Unavailable { credential, reason }) => {
                    debug!("{} unavailable: {}", credential, reason);
                    unavailable.push(format!("{credential}: {reason}"));
                }
                Err(err) => {
                    warn!("{} failed: {}", source.name(), err);
                    return Err(err);
                }
            }
        }

        Err(AuthenticationError::Unavailable {
            credential: "DefaultCredential",
            reason: if unavailable.is_empty() {
                "no credential sources configured".to_owned()
            } else {
                unavailable.join("; ")
            },
        })
    }
}
