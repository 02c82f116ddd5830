// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The primary tier: synchronous, authoritative key/value persistence.
//!
//! The [`Primary`] trait models the host-provided storage primitive:
//! synchronous get/set/remove, capacity bounded. Writes that would exceed
//! the bound fail with [`Error::QuotaExceeded`], which callers must treat
//! as a reported, non-fatal error.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::error::{Error, Result};

/// Synchronous authoritative key/value store.
///
/// Implementations must be cheap to call from the async layers above;
/// nothing here is expected to block on the network.
pub trait Primary: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Removes the value stored under `key`. Removing an absent key is not
    /// an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// SQL schema for the primary store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// SQLite-backed primary store.
///
/// One row per logical record, values stored as JSON text, RFC3339
/// timestamps. An optional capacity bound limits the number of distinct
/// keys; overwriting an existing key is always allowed.
pub struct SqlitePrimary {
    conn: Mutex<Connection>,
    capacity: Option<usize>,
}

impl SqlitePrimary {
    /// Opens or creates an unbounded store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_inner(path.as_ref(), None)
    }

    /// Opens or creates a store bounded to `capacity` distinct keys.
    pub fn open_with_capacity(path: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        Self::open_inner(path.as_ref(), Some(capacity))
    }

    fn open_inner(path: &Path, capacity: Option<usize>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqlitePrimary {
            conn: Mutex::new(conn),
            capacity,
        })
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Primary for SqlitePrimary {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.conn.lock();
        let text: Option<String> = conn
            .query_row(
                "SELECT value FROM records WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match text {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let conn = self.conn.lock();

        if let Some(limit) = self.capacity {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM records WHERE key = ?1)",
                params![key],
                |row| row.get(0),
            )?;
            if !exists {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
                if count as usize >= limit {
                    return Err(Error::QuotaExceeded { limit });
                }
            }
        }

        let text = serde_json::to_string(value)?;
        conn.execute(
            "INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, text, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM records WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-memory primary store.
///
/// Used by tests and by hosts that have no durable path to offer. Honors
/// the same capacity-bound contract as [`SqlitePrimary`].
pub struct MemoryPrimary {
    entries: Mutex<HashMap<String, Value>>,
    capacity: Option<usize>,
}

impl MemoryPrimary {
    /// Creates an unbounded in-memory store.
    pub fn new() -> Self {
        MemoryPrimary {
            entries: Mutex::new(HashMap::new()),
            capacity: None,
        }
    }

    /// Creates a store bounded to `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryPrimary {
            entries: Mutex::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for MemoryPrimary {
    fn default() -> Self {
        Self::new()
    }
}

impl Primary for MemoryPrimary {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let mut entries = self.entries.lock();

        if let Some(limit) = self.capacity {
            if !entries.contains_key(key) && entries.len() >= limit {
                return Err(Error::QuotaExceeded { limit });
            }
        }

        entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "primary_tests.rs"]
mod tests;
