// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed event bus for notifying application logic.
//!
//! The core publishes two events: connectivity transitions and sync
//! completion. UI code subscribes and reacts (typically by updating a
//! connectivity indicator and reloading state after a sync). Publishing
//! with no subscribers is fine; events are simply dropped.

use tokio::sync::broadcast;

/// Events observable by application logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The connectivity flag flipped.
    ConnectivityChanged {
        /// The new state.
        online: bool,
    },
    /// A drain fully succeeded; in-memory state should be reloaded.
    DataSynced,
}

/// Broadcast bus carrying [`Event`]s to any number of subscribers.
///
/// Cloning the bus shares the underlying channel. Subscribers see events
/// in publication order.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a bus with a reasonable buffer.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        EventBus { tx }
    }

    /// Subscribes to events published from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Publishes an event to all current subscribers.
    pub fn publish(&self, event: Event) {
        // No subscribers is not an error
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
