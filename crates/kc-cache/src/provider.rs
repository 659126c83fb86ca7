//! Replay storage provider trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CacheResult;

/// Storage backing a replay cache.
///
/// Implementations must be thread-safe and support concurrent access. The
/// check-and-record operation is a single atomic step: two concurrent calls
/// for the same key must never both report the key as absent.
///
/// Durability (in-memory, shared, persistent) is up to the implementation.
#[async_trait]
pub trait ReplayStorage: Send + Sync {
    /// Records `key` until `expires_at` unless a live entry already exists.
    ///
    /// Returns `true` if an unexpired entry for `key` was already present, in
    /// which case the stored expiration is left untouched. An expired entry is
    /// replaced and reported as absent.
    async fn check_and_record(&self, key: &str, expires_at: DateTime<Utc>) -> CacheResult<bool>;

    /// Removes all entries whose expiration has passed.
    ///
    /// Returns the number of entries removed.
    async fn purge_expired(&self) -> CacheResult<u64>;
}
