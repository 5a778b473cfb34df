use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Monotonic instant; follows the paused clock under `tokio::time::pause`.
pub fn get_instant() -> Instant {
    Instant::now()
}

pub fn instant_after(ttl: Duration) -> Instant {
    get_instant() + ttl
}

pub fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Expiry for a token that is valid for `expires_in` seconds from now.
pub fn expires_in_seconds(expires_in: u64) -> DateTime<Utc> {
    now_utc() + chrono::Duration::seconds(expires_in.min(u32::MAX as u64) as i64)
}
