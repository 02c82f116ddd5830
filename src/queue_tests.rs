// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::primary::MemoryPrimary;
use crate::test_helpers::{make_op, MockSender};
use serde_json::json;

fn open_queue(primary: &Arc<MemoryPrimary>) -> SyncQueue {
    SyncQueue::open(Arc::clone(primary) as Arc<dyn Primary>, DEFAULT_QUEUE_KEY).unwrap()
}

#[test]
fn enqueue_persists_immediately() {
    let primary = Arc::new(MemoryPrimary::new());
    let mut queue = open_queue(&primary);

    queue.enqueue(make_op("daily-tasks", 1)).unwrap();
    queue.enqueue(make_op("daily-notes", 2)).unwrap();

    let blob = primary.get(DEFAULT_QUEUE_KEY).unwrap().unwrap();
    let items = blob.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["key"], "daily-tasks");
    assert_eq!(items[1]["key"], "daily-notes");
}

#[test]
fn open_restores_entries_in_fifo_order() {
    let primary = Arc::new(MemoryPrimary::new());

    {
        let mut queue = open_queue(&primary);
        for n in 0..3 {
            queue.enqueue(make_op("k", n)).unwrap();
        }
    }

    let queue = open_queue(&primary);
    assert_eq!(queue.len(), 3);
    let sequence: Vec<u64> = queue
        .entries()
        .iter()
        .map(|op| op.payload["n"].as_u64().unwrap())
        .collect();
    assert_eq!(sequence, vec![0, 1, 2]);
}

#[test]
fn open_skips_malformed_entries() {
    let primary = Arc::new(MemoryPrimary::new());

    let good = serde_json::to_value(make_op("k", 1)).unwrap();
    let blob = json!([good, {"garbage": true}, "not even an object"]);
    primary.set(DEFAULT_QUEUE_KEY, &blob).unwrap();

    let queue = open_queue(&primary);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.entries()[0].key, "k");
}

#[test]
fn open_tolerates_non_array_blob() {
    let primary = Arc::new(MemoryPrimary::new());
    primary.set(DEFAULT_QUEUE_KEY, &json!("corrupt")).unwrap();

    let queue = open_queue(&primary);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn drain_success_clears_queue_and_persisted_copy() {
    let primary = Arc::new(MemoryPrimary::new());
    let mut queue = open_queue(&primary);
    for n in 0..3 {
        queue.enqueue(make_op(&format!("k{n}"), n)).unwrap();
    }

    let sender = MockSender::new();
    let outcome = queue.drain_all(&sender).await.unwrap();

    assert!(matches!(outcome, DrainOutcome::Completed { delivered: 3 }));
    assert!(queue.is_empty());
    assert!(primary.get(DEFAULT_QUEUE_KEY).unwrap().is_none());
    assert_eq!(sender.delivered_keys(), vec!["k0", "k1", "k2"]);
}

#[tokio::test]
async fn drain_failure_leaves_queue_untouched() {
    let primary = Arc::new(MemoryPrimary::new());
    let mut queue = open_queue(&primary);
    for n in 0..3 {
        queue.enqueue(make_op(&format!("k{n}"), n)).unwrap();
    }

    let sender = MockSender::new();
    sender.fail_from(1);

    let outcome = queue.drain_all(&sender).await.unwrap();
    let DrainOutcome::Aborted { delivered, .. } = outcome else {
        unreachable!("drain should abort");
    };
    assert_eq!(delivered, 1);

    // Neither the in-memory queue nor its persisted copy is trimmed
    assert_eq!(queue.len(), 3);
    let keys: Vec<&str> = queue.entries().iter().map(|op| op.key.as_str()).collect();
    assert_eq!(keys, vec!["k0", "k1", "k2"]);

    let blob = primary.get(DEFAULT_QUEUE_KEY).unwrap().unwrap();
    assert_eq!(blob.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn retried_drain_resends_from_the_start() {
    let primary = Arc::new(MemoryPrimary::new());
    let mut queue = open_queue(&primary);
    for n in 0..3 {
        queue.enqueue(make_op(&format!("k{n}"), n)).unwrap();
    }

    let sender = MockSender::new();
    sender.fail_from(2);
    let outcome = queue.drain_all(&sender).await.unwrap();
    assert!(matches!(outcome, DrainOutcome::Aborted { delivered: 2, .. }));

    sender.allow_all();
    let outcome = queue.drain_all(&sender).await.unwrap();
    assert!(matches!(outcome, DrainOutcome::Completed { delivered: 3 }));
    assert!(queue.is_empty());

    // k0 and k1 were delivered twice; last write wins at the remote
    assert_eq!(
        sender.delivered_keys(),
        vec!["k0", "k1", "k0", "k1", "k2"]
    );
    for n in 0..3u64 {
        let value = sender.remote_value(&format!("k{n}")).unwrap();
        assert_eq!(value["n"], json!(n));
    }
}

#[tokio::test]
async fn redelivering_the_same_op_is_benign() {
    let primary = Arc::new(MemoryPrimary::new());
    let mut queue = open_queue(&primary);
    let op = make_op("daily-tasks", 7);
    queue.enqueue(op.clone()).unwrap();

    let sender = MockSender::new();

    // Simulate a crash between delivery and clearing: deliver, re-enqueue,
    // deliver again
    assert!(matches!(
        queue.drain_all(&sender).await.unwrap(),
        DrainOutcome::Completed { delivered: 1 }
    ));
    queue.enqueue(op.clone()).unwrap();
    assert!(matches!(
        queue.drain_all(&sender).await.unwrap(),
        DrainOutcome::Completed { delivered: 1 }
    ));

    assert_eq!(sender.delivered().len(), 2);
    assert_eq!(sender.remote_value("daily-tasks").unwrap(), op.payload);
}

#[tokio::test]
async fn drain_of_empty_queue_is_a_noop() {
    let primary = Arc::new(MemoryPrimary::new());
    let mut queue = open_queue(&primary);

    let sender = MockSender::new();
    let outcome = queue.drain_all(&sender).await.unwrap();
    assert!(matches!(outcome, DrainOutcome::Completed { delivered: 0 }));
    assert!(sender.delivered().is_empty());
}
