use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::debug;

use crate::cache::token::CachedToken;

/// Expiring token cache keyed by resource.
pub trait TokenStore: Send + Sync {
    /// Live entry for `key`. Never returns an expired token.
    fn get(&self, key: &str) -> impl Future<Output = Option<CachedToken>> + Send;

    /// Returns the live entry for `key`, running `init` to populate it on a miss.
    ///
    /// Population is atomic per key: concurrent callers missing on the same
    /// key wait for a single `init` to finish and then share its result. A
    /// failed `init` stores nothing and its error goes back to that caller.
    fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: &str,
        init: F,
    ) -> impl Future<Output = Result<CachedToken, E>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<CachedToken, E>> + Send,
        E: Send;
}

/// In-process [`TokenStore`]. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    entries: Arc<RwLock<HashMap<String, CachedToken>>>,
    populating: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

static SHARED_STORE: OnceCell<MemoryTokenStore> = OnceCell::const_new();

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide store shared by every provider that asks for it.
    pub async fn shared() -> MemoryTokenStore {
        SHARED_STORE
            .get_or_init(|| async {
                debug!("initializing shared token store");
                MemoryTokenStore::new()
            })
            .await
            .clone()
    }

    async fn evict_if_expired(&self, key: &str) {
        let mut map = self.entries.write().await;
        if map.get(key).is_some_and(CachedToken::is_expired) {
            debug!("evicting expired token for '{}'", key);
            map.remove(key);
        }
    }

    async fn population_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.populating
            .lock()
            .await
            .entry(key.to_owned())
            .or_default()
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Option<CachedToken> {
        let entry = self.entries.read().await.get(key).cloned();
        match entry {
            Some(token) if !token.is_expired() => Some(token),
            Some(_) => {
                self.evict_if_expired(key).await;
                None
            }
            None => None,
        }
    }

    async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, init: F) -> Result<CachedToken, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<CachedToken, E>> + Send,
        E: Send,
    {
        if let Some(token) = self.get(key).await {
            return Ok(token);
        }

        let slot = self.population_lock(key).await;
        let _guard = slot.lock().await;

        // another caller may have populated while we waited
        if let Some(token) = self.get(key).await {
            return Ok(token);
        }

        let token = init().await?;
        self.entries
            .write()
            .await
            .insert(key.to_owned(), token.clone());
        Ok(token)
    }
}
