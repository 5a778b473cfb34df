use reqwest::Response;
use serde::Deserialize;

use crate::cache::token::AccessToken;
use crate::errors::AuthenticationError;
use crate::helpers::time::{expires_in_seconds, from_unix_seconds};

/// Numeric fields arrive as numbers from the token endpoint and as strings
/// from managed identity endpoints.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until expiry.
    pub expires_in: Option<NumberOrString>,
    /// Absolute expiry, unix seconds.
    pub expires_on: Option<NumberOrString>,
}

impl TokenResponse {
    pub fn into_access_token(self) -> Result<AccessToken, AuthenticationError> {
        if self.access_token.is_empty() {
            return Err(AuthenticationError::MalformedResponse(
                "empty access_token".to_owned(),
            ));
        }

        let expires_on = match (&self.expires_on, &self.expires_in) {
            (Some(on), _) => on.as_i64().and_then(from_unix_seconds),
            (None, Some(expires_in)) => expires_in
                .as_i64()
                .map(|secs| expires_in_seconds(secs.max(0) as u64)),
            (None, None) => None,
        }
        .ok_or_else(|| {
            AuthenticationError::MalformedResponse("missing or invalid token expiry".to_owned())
        })?;

        Ok(AccessToken::new(self.access_token, expires_on))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

impl ErrorResponse {
    pub fn message(&self) -> String {
        match &self.error_description {
            Some(description) => format!("{}: {}", self.error, description),
            None => self.error.to_owned(),
        }
    }
}

/// Parse a token endpoint reply into an [`AccessToken`] or a denial.
pub async fn read_token_response(response: Response) -> Result<AccessToken, AuthenticationError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(AuthenticationError::Transport)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message())
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.trim().to_owned()
                }
            });
        return Err(AuthenticationError::Denied {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str::<TokenResponse>(&body)
        .map_err(|e| AuthenticationError::MalformedResponse(e.to_string()))?
        .into_access_token()
}
