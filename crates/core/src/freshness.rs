//! Freshness policy for locally cached Lodestone records.
//!
//! A record is fresh while `now - last_synced_at < TTL`. A record that does
//! not exist locally is always stale, which forces a fetch.

use chrono::Duration;

use crate::types::Timestamp;

/// How long a synced record may be served without refetching: 6 hours.
pub const CACHE_TTL_SECS: i64 = 6 * 60 * 60;

/// [`CACHE_TTL_SECS`] as a [`chrono::Duration`].
pub fn cache_ttl() -> Duration {
    Duration::seconds(CACHE_TTL_SECS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

impl Freshness {
    /// Classify a record by its last sync time. `None` means no local record.
    pub fn of(last_synced_at: Option<Timestamp>, now: Timestamp, ttl: Duration) -> Self {
        match last_synced_at {
            Some(synced) if now - synced < ttl => Self::Fresh,
            _ => Self::Stale,
        }
    }

    pub fn is_fresh(self) -> bool {
        self == Self::Fresh
    }
}

/// Shorthand for [`Freshness::of`] with the default TTL.
pub fn is_fresh(last_synced_at: Timestamp, now: Timestamp) -> bool {
    Freshness::of(Some(last_synced_at), now, cache_ttl()).is_fresh()
}
