// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued write operations.
//!
//! Every write performed while offline is captured as a [`WriteOp`] and
//! appended to the sync queue. Ops are designed to be:
//!
//! - Serializable: persisted with the queue so they survive restart
//! - Replayable: delivered to the remote endpoint in FIFO order
//! - Idempotent: re-delivering the same op is a benign duplicate write
//!   (last-write-wins at the remote endpoint)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A pending write captured while the app was offline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteOp {
    /// Identifier of the logical record being written.
    pub key: String,
    /// The value being persisted.
    pub payload: Value,
    /// What to do with the payload at the remote endpoint.
    pub action: WriteAction,
    /// When the op was appended to the queue.
    pub enqueued_at: DateTime<Utc>,
}

impl WriteOp {
    /// Creates a save op for the given key, timestamped now.
    pub fn save(key: impl Into<String>, payload: Value) -> Self {
        WriteOp {
            key: key.into(),
            payload,
            action: WriteAction::Save,
            enqueued_at: Utc::now(),
        }
    }

    /// Creates a save op with an explicit timestamp.
    pub fn save_at(key: impl Into<String>, payload: Value, enqueued_at: DateTime<Utc>) -> Self {
        WriteOp {
            key: key.into(),
            payload,
            action: WriteAction::Save,
            enqueued_at,
        }
    }
}

/// The kind of write a queued op represents.
///
/// Only `Save` exists today; the enum is non-exhaustive so delete/update
/// variants can be added without breaking queue consumers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum WriteAction {
    /// Persist the payload under the key, replacing any previous value.
    Save,
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
