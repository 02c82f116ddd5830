// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync coordination.
//!
//! The [`SyncCoordinator`] owns the process's connectivity monitor and
//! sync queue. It is constructed once at process start and handed to the
//! façade; there is no hidden global lookup. Draining happens on explicit
//! [`SyncCoordinator::sync_now`] calls and as a side effect of the
//! offline-to-online transition. Delivery failures defer the sync, they
//! are never fatal.
//!
//! No automatic retry timer exists: a deferred sync waits for the next
//! online transition or a manual call.

use std::sync::Arc;

use crate::connectivity::{ConnectivityMonitor, Transition};
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::op::WriteOp;
use crate::primary::Primary;
use crate::queue::{DrainOutcome, SyncQueue};
use crate::sender::Sender;

/// Outcome of a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Not synced: the app is offline.
    Offline,
    /// Nothing was queued; no delivery happened and no event fired.
    Idle,
    /// Every queued entry was delivered and the queue cleared.
    Synced {
        /// Number of entries delivered.
        delivered: usize,
    },
    /// Delivery failed; the queue is retained intact for a later retry.
    Deferred {
        /// Number of entries still pending.
        pending: usize,
    },
}

/// Owns the sync queue and connectivity state for the process.
pub struct SyncCoordinator {
    monitor: ConnectivityMonitor,
    queue: SyncQueue,
    sender: Arc<dyn Sender>,
    bus: EventBus,
}

impl SyncCoordinator {
    /// Creates the coordinator, restoring any queue persisted under
    /// `queue_key` in the primary tier.
    pub fn new(
        primary: Arc<dyn Primary>,
        sender: Arc<dyn Sender>,
        bus: EventBus,
        initially_online: bool,
        queue_key: &str,
    ) -> Result<Self> {
        let queue = SyncQueue::open(primary, queue_key)?;
        let monitor = ConnectivityMonitor::new(initially_online, bus.clone());

        Ok(SyncCoordinator {
            monitor,
            queue,
            sender,
            bus,
        })
    }

    /// Returns the current connectivity state.
    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    /// Returns the number of writes waiting to be delivered.
    pub fn pending_writes(&self) -> usize {
        self.queue.len()
    }

    /// Queues a write for later delivery if the app is offline.
    ///
    /// Returns true if the op was enqueued, false if the app was online
    /// and the op dropped (the caller is expected to have written directly
    /// in that case).
    pub fn record_offline_write(&mut self, op: WriteOp) -> Result<bool> {
        if self.monitor.is_online() {
            tracing::debug!(key = %op.key, "online, not queueing write");
            return Ok(false);
        }

        tracing::debug!(key = %op.key, "queued offline write");
        self.queue.enqueue(op)?;
        Ok(true)
    }

    /// Attempts to drain the queue against the remote endpoint.
    ///
    /// Offline returns immediately; an empty queue is a no-op. On a full
    /// drain success a single [`Event::DataSynced`] is published. On
    /// delivery failure the queue is left intact and the sync deferred.
    pub async fn sync_now(&mut self) -> Result<SyncStatus> {
        if !self.monitor.is_online() {
            tracing::debug!("sync skipped: offline");
            return Ok(SyncStatus::Offline);
        }

        if self.queue.is_empty() {
            return Ok(SyncStatus::Idle);
        }

        tracing::debug!(pending = self.queue.len(), "draining sync queue");
        let sender = Arc::clone(&self.sender);

        match self.queue.drain_all(sender.as_ref()).await? {
            DrainOutcome::Completed { delivered } => {
                tracing::debug!(delivered, "sync complete");
                self.bus.publish(Event::DataSynced);
                Ok(SyncStatus::Synced { delivered })
            }
            DrainOutcome::Aborted { delivered, error } => {
                tracing::warn!(delivered, %error, "sync deferred");
                Ok(SyncStatus::Deferred {
                    pending: self.queue.len(),
                })
            }
        }
    }

    /// Records a host-delivered connectivity notification.
    ///
    /// An offline-to-online transition triggers a drain as a side effect
    /// and returns its status; any other notification returns `None`.
    pub async fn set_online(&mut self, online: bool) -> Result<Option<SyncStatus>> {
        match self.monitor.set_online(online) {
            Some(Transition::WentOnline) => Ok(Some(self.sync_now().await?)),
            Some(Transition::WentOffline) | None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
