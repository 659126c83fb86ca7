//! # kc-cache
//!
//! Cache abstraction traits and the replay cache used by one-time-use checks.
//!
//! ## Storage
//!
//! - [`ReplayStorage`] - Atomic check-and-record contract over expiring keys
//! - [`MemoryReplayStorage`] - In-process storage backed by a sharded map
//!
//! ## Replay Detection
//!
//! - [`ReplayCache`] - Detects reuse of a value within its expiration window
//! - [`StorageReplayCache`] - [`ReplayCache`] built on any [`ReplayStorage`]
//!
//! ## Example
//!
//! ```ignore
//! use chrono::{Duration, Utc};
//! use kc_cache::{MemoryReplayStorage, ReplayCache, StorageReplayCache};
//!
//! let cache = StorageReplayCache::new(MemoryReplayStorage::new());
//! let expires = Utc::now() + Duration::hours(8);
//!
//! assert!(!cache.check_and_record("OneTimeUse", "idp--_abc", expires).await?);
//! assert!(cache.check_and_record("OneTimeUse", "idp--_abc", expires).await?);
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod provider;
pub mod replay;

pub use error::{CacheError, CacheResult};
pub use memory::{MemoryReplayStorage, DEFAULT_CLEANUP_INTERVAL};
pub use provider::ReplayStorage;
pub use replay::{ReplayCache, StorageReplayCache, DEFAULT_REPLAY_EXPIRATION_HOURS};
