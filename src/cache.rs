// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The cache tier: asynchronous, non-authoritative fallback storage.
//!
//! The cache mirrors primary writes so reads can still succeed after the
//! primary evicts a key. It is strictly best-effort: every error here is
//! swallowed and logged by the layer above, never surfaced to callers.
//!
//! Entries carry their storage time and are considered fresh for a bounded
//! window (24 hours by default, see [`crate::datastore::Config`]). The
//! cache namespace is partitioned by a version tag; bumping the tag points
//! lookups at a fresh namespace and simply orphans superseded entries.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O error.
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cache backend refused the operation.
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// A cached value together with its storage time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// The mirrored value.
    pub value: Value,
    /// When the entry was written into the cache.
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stored now.
    pub fn new(value: Value) -> Self {
        CacheEntry {
            value,
            stored_at: Utc::now(),
        }
    }

    /// Creates an entry with an explicit storage time.
    pub fn stored_at(value: Value, stored_at: DateTime<Utc>) -> Self {
        CacheEntry { value, stored_at }
    }

    /// Returns true if the entry is still within its freshness window.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.stored_at) < ttl
    }
}

/// Asynchronous named cache, keyed by the same namespace as the primary
/// store.
///
/// Trait methods return boxed futures so implementations can be held as
/// trait objects behind the store.
pub trait Cache: Send + Sync {
    /// Stores an entry under `key`, replacing any previous entry.
    fn put(
        &self,
        key: &str,
        entry: CacheEntry,
    ) -> Pin<Box<dyn Future<Output = CacheResult<()>> + Send + '_>>;

    /// Returns the entry stored under `key`, if any. Freshness is the
    /// caller's concern; stale entries are still returned.
    fn get(
        &self,
        key: &str,
    ) -> Pin<Box<dyn Future<Output = CacheResult<Option<CacheEntry>>> + Send + '_>>;
}

/// Filesystem-backed cache.
///
/// One JSON file per key under `root/<version_tag>/`. File names are a hex
/// encoding of the key bytes, so any key string maps to a valid file name
/// without collisions.
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    /// Opens the cache namespace for the given version tag, creating the
    /// directory if needed.
    pub fn open(root: impl AsRef<Path>, version_tag: &str) -> CacheResult<Self> {
        let dir = root.as_ref().join(version_tag);
        std::fs::create_dir_all(&dir)?;
        Ok(FsCache { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        use std::fmt::Write;

        let mut name = String::with_capacity(key.len() * 2 + 5);
        for byte in key.as_bytes() {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

impl Cache for FsCache {
    fn put(
        &self,
        key: &str,
        entry: CacheEntry,
    ) -> Pin<Box<dyn Future<Output = CacheResult<()>> + Send + '_>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            let bytes = serde_json::to_vec(&entry)?;
            tokio::fs::write(&path, bytes).await?;
            Ok(())
        })
    }

    fn get(
        &self,
        key: &str,
    ) -> Pin<Box<dyn Future<Output = CacheResult<Option<CacheEntry>>> + Send + '_>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// In-memory cache with failure injection for tests and cache-less hosts.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    failing: AtomicBool,
}

impl MemoryCache {
    /// Creates an empty in-memory cache.
    pub fn new() -> Self {
        MemoryCache {
            entries: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// When set, every cache operation fails with
    /// [`CacheError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns true if an entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn check_available(&self) -> CacheResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache for MemoryCache {
    fn put(
        &self,
        key: &str,
        entry: CacheEntry,
    ) -> Pin<Box<dyn Future<Output = CacheResult<()>> + Send + '_>> {
        let key = key.to_string();
        Box::pin(async move {
            self.check_available()?;
            self.entries.lock().insert(key, entry);
            Ok(())
        })
    }

    fn get(
        &self,
        key: &str,
    ) -> Pin<Box<dyn Future<Output = CacheResult<Option<CacheEntry>>> + Send + '_>> {
        let key = key.to_string();
        Box::pin(async move {
            self.check_available()?;
            Ok(self.entries.lock().get(&key).cloned())
        })
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
