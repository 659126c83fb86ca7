//! Replay cache.
//!
//! Tracks values (typically `issuer--assertionId`) that may only be accepted
//! once within an expiration window. Values are namespaced by a context so
//! independent consumers sharing one storage never collide.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::{CacheError, CacheResult};
use crate::provider::ReplayStorage;

/// Default replay window applied when no caller supplies one.
pub const DEFAULT_REPLAY_EXPIRATION_HOURS: i64 = 8;

/// Replay detection over a time-windowed set of values.
#[async_trait]
pub trait ReplayCache: Send + Sync {
    /// Expiration window used when the caller has no preference.
    fn default_expiration(&self) -> Duration;

    /// Atomically checks whether `value` was seen in `context` and records it.
    ///
    /// Returns `true` if the value is already present and unexpired (a
    /// replay). Otherwise the value is recorded until `expires_at` and
    /// `false` is returned.
    async fn check_and_record(
        &self,
        context: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> CacheResult<bool>;
}

/// Replay cache backed by a [`ReplayStorage`].
#[derive(Debug)]
pub struct StorageReplayCache<S> {
    storage: S,
    default_expiration: Duration,
}

impl<S: ReplayStorage> StorageReplayCache<S> {
    /// Creates a replay cache with the default eight hour window.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            default_expiration: Duration::hours(DEFAULT_REPLAY_EXPIRATION_HOURS),
        }
    }

    /// Overrides the default expiration window.
    ///
    /// Non-positive windows are ignored.
    #[must_use]
    pub fn with_default_expiration(mut self, expiration: Duration) -> Self {
        if expiration > Duration::zero() {
            self.default_expiration = expiration;
        } else {
            tracing::warn!(
                seconds = expiration.num_seconds(),
                "Ignoring non-positive replay cache expiration"
            );
        }
        self
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn storage_key(context: &str, value: &str) -> CacheResult<String> {
        if context.is_empty() {
            return Err(CacheError::InvalidKey("replay context is empty".to_string()));
        }
        Ok(format!("{context}:{value}"))
    }
}

#[async_trait]
impl<S: ReplayStorage> ReplayCache for StorageReplayCache<S> {
    fn default_expiration(&self) -> Duration {
        self.default_expiration
    }

    async fn check_and_record(
        &self,
        context: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> CacheResult<bool> {
        let key = Self::storage_key(context, value)?;
        let seen = self.storage.check_and_record(&key, expires_at).await?;
        if seen {
            tracing::warn!(context, value, "Replay detected");
        } else {
            tracing::debug!(context, value, %expires_at, "Recorded value in replay cache");
        }
        Ok(seen)
    }
}
