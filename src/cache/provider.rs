use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::token::CachedToken;
use crate::cache::token_store::{MemoryTokenStore, TokenStore};
use crate::dataverse::resource::ResourceKey;
use crate::errors::AuthenticationError;
use crate::helpers::time::instant_after;
use crate::identity::TokenCredential;
use crate::utils::constants::DEFAULT_TOKEN_CACHE_TTL_SECS;

/// Anything that can hand out a bearer token for a resource.
pub trait BearerTokenSource: Send + Sync {
    fn bearer_token(
        &self,
        resource: &ResourceKey,
    ) -> impl Future<Output = Result<String, AuthenticationError>> + Send;
}

/// Bearer tokens per resource, served from a [`TokenStore`] and minted by a
/// [`TokenCredential`] on a miss.
///
/// Entries live for a fixed TTL from the moment they are stored, regardless
/// of the expiry the backend reports. Nothing is refreshed ahead of time.
#[derive(Debug, Clone)]
pub struct CachedTokenProvider<C, S = MemoryTokenStore> {
    credential: C,
    store: S,
    ttl: Duration,
}

impl<C, S> CachedTokenProvider<C, S>
where
    C: TokenCredential,
    S: TokenStore,
{
    pub fn new(credential: C, store: S) -> Self {
        Self {
            credential,
            store,
            ttl: Duration::from_secs(DEFAULT_TOKEN_CACHE_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached token for `resource`, or a fresh one for `<resource>/.default`.
    ///
    /// Backend errors are returned exactly as the credential produced them.
    pub async fn get_token(&self, resource: &ResourceKey) -> Result<String, C::Error> {
        if let Some(token) = self.store.get(resource.as_str()).await {
            debug!("token cache hit for '{}'", resource);
            return Ok(token.value);
        }

        let token = self
            .store
            .get_or_try_insert_with(resource.as_str(), || async {
                debug!("token cache miss for '{}', requesting new token", resource);
                let scope = resource.default_scope();
                let access = self.credential.get_token(&[scope.as_str()]).await?;
                info!(
                    "token acquired for '{}', backend expiry {}, cached for {}s",
                    resource,
                    access.expires_on,
                    self.ttl.as_secs()
                );
                Ok::<_, C::Error>(CachedToken::new(access.token, instant_after(self.ttl)))
            })
            .await?;

        Ok(token.value)
    }
}

impl<C, S> BearerTokenSource for CachedTokenProvider<C, S>
where
    C: TokenCredential<Error = AuthenticationError>,
    S: TokenStore,
{
    async fn bearer_token(&self, resource: &ResourceKey) -> Result<String, AuthenticationError> {
        self.get_token(resource).await
    }
}
