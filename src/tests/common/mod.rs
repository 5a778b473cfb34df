// tests/common/mod.rs
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::cache::token::AccessToken;
use crate::errors::AuthenticationError;
use crate::helpers::time::now_utc;
use crate::identity::TokenCredential;

pub const ORG_URL: &str = "https://org.crm.dynamics.com";

/// Error type foreign to the crate, to check it comes back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stub backend refused: {0}")]
pub struct StubError(pub String);

/// Identity backend that counts calls and hands out a fixed token.
///
/// Queued failures are returned first, one per call.
pub struct StubCredential<E = AuthenticationError> {
    token: String,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    scopes: Arc<Mutex<Vec<String>>>,
    failures: Arc<Mutex<VecDeque<E>>>,
}

impl<E> StubCredential<E> {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_owned(),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            scopes: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_next(&self, err: E) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn scopes(&self) -> Vec<String> {
        self.scopes.lock().unwrap().clone()
    }
}

impl<E> Clone for StubCredential<E> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            delay: self.delay,
            calls: self.calls.clone(),
            scopes: self.scopes.clone(),
            failures: self.failures.clone(),
        }
    }
}

impl<E> fmt::Debug for StubCredential<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubCredential")
            .field("calls", &self.calls())
            .finish()
    }
}

impl<E> TokenCredential for StubCredential<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, E> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scopes
            .lock()
            .unwrap()
            .extend(scopes.iter().map(|s| s.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().unwrap().pop_front();
        if let Some(err) = failure {
            return Err(err);
        }
        Ok(AccessToken::new(
            self.token.clone(),
            now_utc() + chrono::Duration::minutes(20),
        ))
    }
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}
