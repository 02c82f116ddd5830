// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Data access façade.
//!
//! [`Datastore`] is the single entry point application logic uses for
//! reads and writes. It hides the two-tier store and the offline queue:
//! `save` always commits to the primary tier and, when offline, also
//! records the write for later delivery; `load` reads primary-then-cache.
//!
//! The façade also re-exposes the sync surface (manual sync, connectivity
//! notifications, event subscription) so callers hold exactly one handle.

use std::sync::Arc;

use chrono::Duration;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::cache::Cache;
use crate::coordinator::{SyncCoordinator, SyncStatus};
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::op::WriteOp;
use crate::primary::Primary;
use crate::queue::DEFAULT_QUEUE_KEY;
use crate::store::TieredStore;
use crate::validate;

/// Configuration for the data façade.
#[derive(Debug, Clone)]
pub struct Config {
    /// Freshness window for cache-tier entries.
    pub cache_ttl: Duration,
    /// Reserved primary-tier key under which the sync queue persists.
    pub queue_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_ttl: Duration::hours(24),
            queue_key: DEFAULT_QUEUE_KEY.to_string(),
        }
    }
}

/// Save/load entry point for application logic.
pub struct Datastore {
    store: TieredStore,
    coordinator: SyncCoordinator,
    bus: EventBus,
}

impl Datastore {
    /// Wires the façade over the host-provided tiers and delivery
    /// endpoint.
    ///
    /// `initially_online` is the host's reported network status at
    /// construction time.
    pub fn new(
        primary: Arc<dyn Primary>,
        cache: Arc<dyn Cache>,
        sender: Arc<dyn crate::sender::Sender>,
        initially_online: bool,
        config: Config,
    ) -> Result<Self> {
        let bus = EventBus::new();
        let coordinator = SyncCoordinator::new(
            Arc::clone(&primary),
            sender,
            bus.clone(),
            initially_online,
            &config.queue_key,
        )?;
        let store = TieredStore::new(primary, cache, config.cache_ttl);

        Ok(Datastore {
            store,
            coordinator,
            bus,
        })
    }

    /// Persists `value` under `key`.
    ///
    /// The primary write is synchronous and its failure (including quota
    /// exhaustion) surfaces here; cache mirroring stays best-effort in the
    /// background. When offline, the write is additionally queued for
    /// remote delivery.
    pub fn save(&mut self, key: &str, value: Value) -> Result<()> {
        if self.coordinator.is_online() {
            self.store.write(key, value)?;
        } else {
            self.store.write(key, value.clone())?;
            self.coordinator.record_offline_write(WriteOp::save(key, value))?;
        }
        Ok(())
    }

    /// Loads the value under `key`, or `None` if absent from both tiers.
    pub async fn load(&self, key: &str) -> Result<Option<Value>> {
        self.store.read(key).await
    }

    /// Loads a record list under `key`, dropping malformed elements.
    ///
    /// A missing key or a stored value that is not an array yields an
    /// empty vec.
    pub async fn load_records(&self, key: &str) -> Result<Vec<Value>> {
        match self.store.read(key).await? {
            Some(Value::Array(items)) => Ok(validate::filter_valid(items)),
            Some(_) => {
                tracing::warn!(key, "stored value is not a record list");
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    /// Manually triggers a sync attempt (e.g. user-initiated retry).
    pub async fn sync_now(&mut self) -> Result<SyncStatus> {
        self.coordinator.sync_now().await
    }

    /// Forwards a host connectivity notification to the coordinator.
    pub async fn set_online(&mut self, online: bool) -> Result<Option<SyncStatus>> {
        self.coordinator.set_online(online).await
    }

    /// Returns the current connectivity state.
    pub fn is_online(&self) -> bool {
        self.coordinator.is_online()
    }

    /// Returns the number of writes waiting to be delivered.
    pub fn pending_writes(&self) -> usize {
        self.coordinator.pending_writes()
    }

    /// Subscribes to connectivity and sync events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
#[path = "datastore_tests.rs"]
mod tests;
