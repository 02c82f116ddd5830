// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tasknotes-sync operations.
//!
//! This enum covers the primary-tier failures that callers of `save`/`load`
//! must handle. Cache and delivery failures have their own local error
//! types ([`crate::cache::CacheError`], [`crate::sender::DeliveryError`])
//! because they never propagate past the layer that absorbs them.

use thiserror::Error;

/// All possible errors that can surface from the data façade.
#[derive(Debug, Error)]
pub enum Error {
    #[error("persist failed: {0}")]
    Persistence(String),

    #[error("quota exceeded: primary store is full (limit {limit} entries)")]
    QuotaExceeded { limit: usize },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tasknotes-sync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
