// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tokio::sync::broadcast::error::TryRecvError;

#[test]
fn initial_state_comes_from_the_host() {
    let bus = EventBus::new();
    assert!(ConnectivityMonitor::new(true, bus.clone()).is_online());
    assert!(!ConnectivityMonitor::new(false, bus).is_online());
}

#[tokio::test]
async fn transition_publishes_exactly_one_event() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let mut monitor = ConnectivityMonitor::new(true, bus);

    assert_eq!(monitor.set_online(false), Some(Transition::WentOffline));
    assert!(!monitor.is_online());
    assert_eq!(
        rx.try_recv().unwrap(),
        Event::ConnectivityChanged { online: false }
    );

    assert_eq!(monitor.set_online(true), Some(Transition::WentOnline));
    assert_eq!(
        rx.try_recv().unwrap(),
        Event::ConnectivityChanged { online: true }
    );
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn repeated_notifications_fire_nothing() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let mut monitor = ConnectivityMonitor::new(true, bus);

    assert_eq!(monitor.set_online(true), None);
    assert_eq!(monitor.set_online(true), None);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}
