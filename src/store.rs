// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Two-tier durable store.
//!
//! Writes commit synchronously to the primary tier and are mirrored into
//! the cache tier by a detached write-behind task. Reads consult the
//! primary tier first (authoritative) and fall back to a fresh cache entry
//! on a miss.
//!
//! Cache failures never block or fail a write; the mirror task logs them
//! and moves on. A record absent from both tiers is a plain `None`, not an
//! error.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;

use crate::cache::{Cache, CacheEntry};
use crate::error::Result;
use crate::primary::Primary;

/// Two-tier store combining a primary tier and a cache tier.
pub struct TieredStore {
    primary: Arc<dyn Primary>,
    cache: Arc<dyn Cache>,
    cache_ttl: Duration,
}

impl TieredStore {
    /// Creates a store over the given tiers.
    pub fn new(primary: Arc<dyn Primary>, cache: Arc<dyn Cache>, cache_ttl: Duration) -> Self {
        TieredStore {
            primary,
            cache,
            cache_ttl,
        }
    }

    /// Persists `value` under `key`.
    ///
    /// The primary write is synchronous and its failure surfaces to the
    /// caller. The cache mirror runs as a detached task on the current
    /// tokio runtime and is never awaited; must be called from within a
    /// runtime.
    pub fn write(&self, key: &str, value: Value) -> Result<()> {
        self.primary.set(key, &value)?;

        let cache = Arc::clone(&self.cache);
        let key = key.to_string();
        let entry = CacheEntry::new(value);
        tokio::spawn(async move {
            if let Err(e) = cache.put(&key, entry).await {
                tracing::warn!(key = %key, error = %e, "cache mirror failed");
            }
        });

        Ok(())
    }

    /// Reads the value under `key`: primary tier first, then a fresh cache
    /// entry, then `None`.
    pub async fn read(&self, key: &str) -> Result<Option<Value>> {
        if let Some(value) = self.primary.get(key)? {
            return Ok(Some(value));
        }

        match self.cache.get(key).await {
            Ok(Some(entry)) if entry.is_fresh(Utc::now(), self.cache_ttl) => {
                tracing::debug!(key, "primary miss served from cache");
                Ok(Some(entry.value))
            }
            Ok(Some(_)) => {
                tracing::debug!(key, "cache entry expired, treating as miss");
                Ok(None)
            }
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
