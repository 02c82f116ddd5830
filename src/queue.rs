// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO queue of writes accumulated while offline.
//!
//! The queue persists itself into the primary tier under a reserved key on
//! every append, so it survives a process restart while offline. Draining
//! is all-or-nothing: entries are delivered in FIFO order, the first
//! failure aborts the drain with the queue untouched (memory and persisted
//! copy both), and only a fully successful drain clears it. A retried
//! drain therefore re-sends from the start, which is why senders must be
//! idempotent.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::op::WriteOp;
use crate::primary::Primary;
use crate::sender::{DeliveryError, Sender};

/// Default primary-tier key under which the queue persists itself.
pub const DEFAULT_QUEUE_KEY: &str = "pending-sync";

/// Outcome of a drain attempt.
#[derive(Debug)]
pub enum DrainOutcome {
    /// Every entry was delivered; the queue is now empty and its persisted
    /// copy removed.
    Completed {
        /// Number of entries delivered.
        delivered: usize,
    },
    /// Delivery failed partway; the queue was left untouched.
    Aborted {
        /// Number of entries delivered before the failure.
        delivered: usize,
        /// The delivery error that aborted the drain.
        error: DeliveryError,
    },
}

/// Durable FIFO queue of pending writes.
pub struct SyncQueue {
    primary: Arc<dyn Primary>,
    key: String,
    entries: Vec<WriteOp>,
}

impl SyncQueue {
    /// Opens the queue, restoring any entries persisted under `key`.
    ///
    /// Individually malformed persisted entries are skipped with a warning;
    /// a persisted blob that is not an array yields an empty queue.
    pub fn open(primary: Arc<dyn Primary>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();

        let entries = match primary.get(&key)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<WriteOp>(item) {
                    Ok(op) => Some(op),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping malformed queue entry");
                        None
                    }
                })
                .collect(),
            Some(_) => {
                tracing::warn!(key = %key, "persisted queue is not an array, starting empty");
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(SyncQueue {
            primary,
            key,
            entries,
        })
    }

    /// Appends an op to the tail and re-persists the queue immediately.
    pub fn enqueue(&mut self, op: WriteOp) -> Result<()> {
        self.entries.push(op);
        self.persist()
    }

    /// Attempts to deliver every entry, in FIFO order, via `sender`.
    ///
    /// All-or-nothing: the first delivery failure aborts the drain and the
    /// queue keeps every entry it had, in order. Only a drain where every
    /// entry succeeds clears the queue and deletes its persisted copy.
    pub async fn drain_all(&mut self, sender: &dyn Sender) -> Result<DrainOutcome> {
        let total = self.entries.len();

        for (delivered, op) in self.entries.iter().enumerate() {
            if let Err(error) = sender.deliver(op).await {
                tracing::warn!(
                    key = %op.key,
                    delivered,
                    pending = total - delivered,
                    %error,
                    "drain aborted, queue retained"
                );
                return Ok(DrainOutcome::Aborted { delivered, error });
            }
        }

        self.entries.clear();
        self.primary.remove(&self.key)?;

        Ok(DrainOutcome::Completed { delivered: total })
    }

    /// Returns the queued entries in FIFO order.
    pub fn entries(&self) -> &[WriteOp] {
        &self.entries
    }

    /// Returns the number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let blob = serde_json::to_value(&self.entries)?;
        self.primary.set(&self.key, &blob)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
