// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote delivery abstraction used during queue drains.
//!
//! The [`Sender`] trait stands in for whatever carries a write to the
//! remote endpoint. Its concrete protocol is out of scope here; the
//! shipped [`StubSender`] simulates a network call with a fixed delay and
//! always succeeds, matching how the app is exercised without a backend.
//!
//! Senders must be idempotent with respect to repeated delivery of the
//! same key+payload: an aborted drain is retried from the start, so
//! last-write-wins semantics at the remote endpoint are required.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::op::WriteOp;

/// Error type for delivery attempts.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The remote endpoint rejected or lost the write.
    #[error("delivery failed: {0}")]
    Failed(String),

    /// The remote endpoint could not be reached.
    #[error("remote endpoint unavailable: {0}")]
    Unavailable(String),
}

/// Result type for delivery attempts.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Delivers queued writes to the remote endpoint.
pub trait Sender: Send + Sync {
    /// Delivers one op. An `Err` aborts the surrounding drain.
    fn deliver(
        &self,
        op: &WriteOp,
    ) -> Pin<Box<dyn Future<Output = DeliveryResult<()>> + Send + '_>>;
}

/// Simulated remote endpoint: sleeps for a fixed delay, then succeeds.
pub struct StubSender {
    delay: Duration,
}

impl StubSender {
    /// Creates a stub with the default 100 ms artificial delay.
    pub fn new() -> Self {
        StubSender {
            delay: Duration::from_millis(100),
        }
    }

    /// Creates a stub with a custom delay.
    pub fn with_delay(delay: Duration) -> Self {
        StubSender { delay }
    }
}

impl Default for StubSender {
    fn default() -> Self {
        Self::new()
    }
}

impl Sender for StubSender {
    fn deliver(
        &self,
        op: &WriteOp,
    ) -> Pin<Box<dyn Future<Output = DeliveryResult<()>> + Send + '_>> {
        let delay = self.delay;
        let key = op.key.clone();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(key = %key, "delivered write to stub endpoint");
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "sender_tests.rs"]
mod tests;
