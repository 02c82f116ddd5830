// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking.
//!
//! A single online/offline flag, initialized from the host's reported
//! network status and mutated only by host-delivered transition
//! notifications. There is no polling. Each real transition publishes one
//! [`Event::ConnectivityChanged`]; repeated notifications of the current
//! state publish nothing.

use crate::events::{Event, EventBus};

/// A connectivity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The app went from offline to online.
    WentOnline,
    /// The app went from online to offline.
    WentOffline,
}

/// Tracks the process-wide online/offline state.
pub struct ConnectivityMonitor {
    online: bool,
    bus: EventBus,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the host's current network status.
    pub fn new(initially_online: bool, bus: EventBus) -> Self {
        ConnectivityMonitor {
            online: initially_online,
            bus,
        }
    }

    /// Returns the current state.
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Records a host-delivered connectivity notification.
    ///
    /// Returns the transition if the state actually changed, publishing a
    /// `ConnectivityChanged` event exactly once per transition.
    pub fn set_online(&mut self, online: bool) -> Option<Transition> {
        if online == self.online {
            return None;
        }

        self.online = online;
        tracing::debug!(online, "connectivity changed");
        self.bus.publish(Event::ConnectivityChanged { online });

        Some(if online {
            Transition::WentOnline
        } else {
            Transition::WentOffline
        })
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
