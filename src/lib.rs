// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tasknotes-sync: Offline-first persistence and sync core.
//!
//! This crate is the data layer for a tasks/notes application that must
//! keep working while disconnected. Writes always land in a synchronous
//! primary store, get mirrored into an asynchronous cache tier, and are
//! queued for remote delivery whenever the app is offline. When
//! connectivity returns, the queue is drained in FIFO order against the
//! remote endpoint and a `DataSynced` event tells the UI to reload.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  save/load   ┌─────────────┐   write    ┌──────────────┐
//! │  UI code   │─────────────►│  Datastore  │───────────►│ TieredStore  │
//! └────────────┘              └─────────────┘            │ primary+cache│
//!        ▲                          │ offline writes     └──────────────┘
//!        │ events                   ▼
//! ┌────────────┐  drain    ┌─────────────────┐  deliver  ┌──────────────┐
//! │  EventBus  │◄──────────│ SyncCoordinator │──────────►│ Sender (dyn) │
//! └────────────┘           │  + SyncQueue    │           └──────────────┘
//!                          └─────────────────┘
//! ```

pub mod cache;
pub mod connectivity;
pub mod coordinator;
pub mod datastore;
pub mod error;
pub mod events;
pub mod op;
pub mod primary;
pub mod queue;
pub mod sender;
pub mod store;
pub mod validate;

pub use cache::{Cache, CacheEntry, CacheError, FsCache, MemoryCache};
pub use connectivity::{ConnectivityMonitor, Transition};
pub use coordinator::{SyncCoordinator, SyncStatus};
pub use datastore::{Config, Datastore};
pub use error::{Error, Result};
pub use events::{Event, EventBus};
pub use op::{WriteAction, WriteOp};
pub use primary::{MemoryPrimary, Primary, SqlitePrimary};
pub use queue::{DrainOutcome, SyncQueue};
pub use sender::{DeliveryError, Sender, StubSender};
pub use store::TieredStore;
pub use validate::Validity;

#[cfg(test)]
mod test_helpers;
