//! # AuditSpace snapshot client
//!
//! Captures a snapshot of a Dataverse record by invoking the
//! `unl_AuditSpaceSnapshot` custom action with a bearer token from
//! Entra ID. Tokens are cached per environment for a fixed lifetime so
//! repeated calls skip the identity round-trip.
//!
//! Modules:
//! - `cache` — token store and the caching token provider
//! - `identity` — client secret, managed identity and chained credentials
//! - `dataverse` — environment url, action payload, Web API client, form-load flow
//! - `config` — settings file loading
//! - `snapshot` — wiring for the console binary

pub mod cache;
pub mod config;
pub mod dataverse;
pub mod errors;
pub mod helpers;
pub mod identity;
pub mod snapshot;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::provider::CachedTokenProvider;
pub use crate::errors::{AuthenticationError, ConfigError, ExecuteError, InvocationError};
