//! In-memory replay storage.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::CacheResult;
use crate::provider::ReplayStorage;

/// Number of recorded keys between sweeps of expired entries.
pub const DEFAULT_CLEANUP_INTERVAL: u64 = 1024;

/// Replay storage kept in process memory.
///
/// Entries live in a sharded concurrent map. Check-and-record holds the shard
/// lock for the key while it inspects and writes the entry, so concurrent
/// callers racing on the same key are serialized.
///
/// Expired entries are swept every [`DEFAULT_CLEANUP_INTERVAL`] recorded keys
/// (see [`MemoryReplayStorage::with_cleanup_interval`]), so the map stays
/// bounded by the number of live keys without a separate cleanup task.
#[derive(Debug)]
pub struct MemoryReplayStorage {
    entries: DashMap<String, DateTime<Utc>>,
    cleanup_interval: u64,
    recorded: AtomicU64,
}

impl Default for MemoryReplayStorage {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            recorded: AtomicU64::new(0),
        }
    }
}

impl MemoryReplayStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweeps expired entries every `interval` recorded keys.
    ///
    /// Zero disables the sweep; [`ReplayStorage::purge_expired`] still works.
    #[must_use]
    pub fn with_cleanup_interval(mut self, interval: u64) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Returns the number of entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the storage holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record_at(&self, key: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let seen = self.check_entry(key, expires_at, now);
        if !seen {
            self.maybe_sweep(now);
        }
        seen
    }

    fn check_entry(&self, key: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if *entry.get() > now {
                    true
                } else {
                    entry.insert(expires_at);
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(expires_at);
                false
            }
        }
    }

    /// Runs after the entry guard is released: `retain` locks every shard.
    fn maybe_sweep(&self, now: DateTime<Utc>) {
        if self.cleanup_interval == 0 {
            return;
        }
        let recorded = self.recorded.fetch_add(1, Ordering::Relaxed) + 1;
        if recorded % self.cleanup_interval == 0 {
            self.sweep(now);
        }
    }

    fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, "Purged expired replay cache entries");
        }
        removed
    }
}

#[async_trait]
impl ReplayStorage for MemoryReplayStorage {
    async fn check_and_record(&self, key: &str, expires_at: DateTime<Utc>) -> CacheResult<bool> {
        Ok(self.record_at(key, expires_at, Utc::now()))
    }

    async fn purge_expired(&self) -> CacheResult<u64> {
        Ok(self.sweep(Utc::now()) as u64)
    }
}
