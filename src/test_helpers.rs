// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::op::WriteOp;
use crate::sender::{DeliveryError, DeliveryResult, Sender};

/// Recording sender with programmable failure.
///
/// Keeps every successfully delivered op plus a last-write-wins "remote"
/// map, so tests can check both delivery order and end-state idempotence.
pub struct MockSender {
    delivered: Mutex<Vec<WriteOp>>,
    remote: Mutex<HashMap<String, Value>>,
    calls: AtomicUsize,
    fail_from: Mutex<Option<usize>>,
}

impl MockSender {
    pub fn new() -> Self {
        MockSender {
            delivered: Mutex::new(Vec::new()),
            remote: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            fail_from: Mutex::new(None),
        }
    }

    /// Fails every delivery call with index >= `call_index` (0-based,
    /// counted across the sender's lifetime) until [`Self::allow_all`].
    pub fn fail_from(&self, call_index: usize) {
        *self.fail_from.lock() = Some(call_index);
    }

    /// Clears any programmed failure.
    pub fn allow_all(&self) {
        *self.fail_from.lock() = None;
    }

    /// All successfully delivered ops, in delivery order.
    pub fn delivered(&self) -> Vec<WriteOp> {
        self.delivered.lock().clone()
    }

    /// Keys of all successfully delivered ops, in delivery order.
    pub fn delivered_keys(&self) -> Vec<String> {
        self.delivered.lock().iter().map(|op| op.key.clone()).collect()
    }

    /// Current remote value for `key` (last write wins).
    pub fn remote_value(&self, key: &str) -> Option<Value> {
        self.remote.lock().get(key).cloned()
    }
}

impl Sender for MockSender {
    fn deliver(
        &self,
        op: &WriteOp,
    ) -> Pin<Box<dyn Future<Output = DeliveryResult<()>> + Send + '_>> {
        let op = op.clone();
        Box::pin(async move {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(from) = *self.fail_from.lock() {
                if index >= from {
                    return Err(DeliveryError::Unavailable(format!(
                        "injected failure at call {index}"
                    )));
                }
            }
            self.delivered.lock().push(op.clone());
            self.remote.lock().insert(op.key.clone(), op.payload);
            Ok(())
        })
    }
}

/// Creates a save op whose payload carries a recognizable sequence number.
pub fn make_op(key: &str, n: u64) -> WriteOp {
    WriteOp::save(key, json!({ "id": format!("{key}-{n}"), "n": n }))
}

/// Lets detached tasks spawned on the current runtime run to completion.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
