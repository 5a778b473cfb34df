#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::cache::provider::CachedTokenProvider;
    use crate::cache::token::CachedToken;
    use crate::cache::token_store::{MemoryTokenStore, TokenStore};
    use crate::dataverse::resource::ResourceKey;
    use crate::errors::AuthenticationError;
    use crate::helpers::time::instant_after;
    use crate::tests::common::{StubCredential, StubError, ORG_URL};

    const TWENTY_MINUTES: Duration = Duration::from_secs(20 * 60);

    fn org() -> ResourceKey {
        ResourceKey::parse(ORG_URL).unwrap()
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let stub: StubCredential = StubCredential::new("abc");
        let provider = CachedTokenProvider::new(stub.clone(), MemoryTokenStore::new());

        let first = provider.get_token(&org()).await.unwrap();
        let second = provider.get_token(&org()).await.unwrap();

        assert_eq!(first, "abc");
        assert_eq!(second, "abc");
        assert_eq!(stub.calls(), 1);
        assert_eq!(stub.scopes(), vec![format!("{ORG_URL}/.default")]);
    }

    #[tokio::test(start_paused = true)]
    async fn token_is_fetched_again_once_ttl_elapses() {
        let stub: StubCredential = StubCredential::new("abc");
        let provider = CachedTokenProvider::new(stub.clone(), MemoryTokenStore::new());
        assert_eq!(provider.ttl(), TWENTY_MINUTES);

        provider.get_token(&org()).await.unwrap();

        tokio::time::advance(TWENTY_MINUTES - Duration::from_secs(1)).await;
        provider.get_token(&org()).await.unwrap();
        assert_eq!(stub.calls(), 1, "still cached one second before expiry");

        tokio::time::advance(Duration::from_secs(1)).await;
        provider.get_token(&org()).await.unwrap();
        assert_eq!(stub.calls(), 2, "expired entry triggers exactly one new call");

        provider.get_token(&org()).await.unwrap();
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_ttl_replaces_default() {
        let stub: StubCredential = StubCredential::new("abc");
        let provider = CachedTokenProvider::new(stub.clone(), MemoryTokenStore::new())
            .with_ttl(Duration::from_secs(60));

        provider.get_token(&org()).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        provider.get_token(&org()).await.unwrap();

        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn backend_error_is_returned_unchanged() {
        let stub = StubCredential::<StubError>::new("abc");
        stub.fail_next(StubError("credential denied".to_owned()));
        let provider = CachedTokenProvider::new(stub.clone(), MemoryTokenStore::new());

        let err = provider.get_token(&org()).await.unwrap_err();

        assert_eq!(err, StubError("credential denied".to_owned()));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn failed_population_caches_nothing() {
        let stub: StubCredential = StubCredential::new("abc");
        stub.fail_next(AuthenticationError::Denied {
            status: 401,
            message: "invalid_client".to_owned(),
        });
        let store = MemoryTokenStore::new();
        let provider = CachedTokenProvider::new(stub.clone(), store.clone());

        let err = provider.get_token(&org()).await.unwrap_err();
        assert!(matches!(err, AuthenticationError::Denied { status: 401, .. }));
        assert!(store.get(ORG_URL).await.is_none());

        assert_eq!(provider.get_token(&org()).await.unwrap(), "abc");
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_share_one_backend_call() {
        let stub: StubCredential = StubCredential::new("abc").with_delay(Duration::from_millis(100));
        let provider = Arc::new(CachedTokenProvider::new(stub.clone(), MemoryTokenStore::new()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = provider.clone();
                tokio::spawn(async move { provider.get_token(&org()).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "abc");
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn resources_are_cached_independently() {
        let stub: StubCredential = StubCredential::new("abc");
        let provider = CachedTokenProvider::new(stub.clone(), MemoryTokenStore::new());
        let other = ResourceKey::parse("https://other.crm4.dynamics.com").unwrap();

        provider.get_token(&org()).await.unwrap();
        provider.get_token(&other).await.unwrap();
        provider.get_token(&other).await.unwrap();

        assert_eq!(stub.calls(), 2);
        assert_eq!(
            stub.scopes(),
            vec![
                format!("{ORG_URL}/.default"),
                "https://other.crm4.dynamics.com/.default".to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn trailing_slash_maps_to_same_entry() {
        let stub: StubCredential = StubCredential::new("abc");
        let provider = CachedTokenProvider::new(stub.clone(), MemoryTokenStore::new());

        provider.get_token(&org()).await.unwrap();
        let with_slash = ResourceKey::parse(&format!("{ORG_URL}/")).unwrap();
        provider.get_token(&with_slash).await.unwrap();

        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn providers_on_shared_store_reuse_tokens() {
        let first: StubCredential = StubCredential::new("abc");
        let second: StubCredential = StubCredential::new("xyz");
        let store = MemoryTokenStore::shared().await;
        let key = ResourceKey::parse("https://shared-store.crm.dynamics.com").unwrap();

        let token = CachedTokenProvider::new(first.clone(), store)
            .get_token(&key)
            .await
            .unwrap();
        let reused = CachedTokenProvider::new(second.clone(), MemoryTokenStore::shared().await)
            .get_token(&key)
            .await
            .unwrap();

        assert_eq!(token, "abc");
        assert_eq!(reused, "abc");
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn store_drops_expired_entries() {
        let store = MemoryTokenStore::new();
        store
            .get_or_try_insert_with("key", || async {
                Ok::<_, StubError>(CachedToken::new("v".to_owned(), instant_after(Duration::from_secs(5))))
            })
            .await
            .unwrap();
        assert!(store.get("key").await.is_some());

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(store.get("key").await.is_none());
    }
}
