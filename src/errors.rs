//! Error kinds surfaced by the snapshot client.
//!
//! Configuration problems abort before any network activity, identity
//! backend failures are handed back untouched, and failed action calls are
//! reported to the caller without retry.

use std::path::PathBuf;

use thiserror::Error;

/// Required setting missing or unusable. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings format: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} is not configured")]
    MissingSetting(&'static str),

    #[error("{key} '{value}' is not a valid base url: {reason}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Identity backend could not produce a token.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The credential source is not configured or not reachable here.
    #[error("{credential} unavailable: {reason}")]
    Unavailable {
        credential: &'static str,
        reason: String,
    },

    #[error("token request denied ({status}): {message}")]
    Denied { status: u16, message: String },

    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    #[error("invalid scope request: {0}")]
    InvalidScope(String),
}

/// The custom action call failed or could not be built.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("'{0}' is not a valid record id")]
    InvalidRecordId(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("action rejected ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("action request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Outcome of [`crate::dataverse::client::DataverseClient::execute`].
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),
}
