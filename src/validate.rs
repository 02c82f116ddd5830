// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record shape validation for load paths.
//!
//! Stored record lists can accumulate junk: a crashed write, a schema from
//! an older app version, a hand-edited value. Loading filters each element
//! through [`validate_record`] and drops the invalid ones rather than
//! failing the whole load.

use serde_json::Value;

/// Result of validating a single stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum Validity {
    /// The record is well-formed and usable.
    Valid(Value),
    /// The record fails shape validation and should be skipped.
    Invalid {
        /// Human-readable description of what was wrong.
        reason: String,
    },
}

impl Validity {
    /// Returns true if the record passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid(_))
    }
}

/// Validates the basic shape of a stored record.
///
/// A record is valid when it is a JSON object carrying a non-empty string
/// `id`. Everything else about the record is left to the caller.
pub fn validate_record(value: Value) -> Validity {
    let reason = match &value {
        Value::Object(fields) => match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => None,
            Some(Value::String(_)) => Some("empty id"),
            Some(_) => Some("id is not a string"),
            None => Some("missing id field"),
        },
        _ => Some("not an object"),
    };

    match reason {
        None => Validity::Valid(value),
        Some(reason) => Validity::Invalid {
            reason: reason.to_string(),
        },
    }
}

/// Filters a loaded record list down to its valid elements.
///
/// Invalid elements are dropped with a log line (skip-and-continue); order
/// of the surviving records is preserved.
pub fn filter_valid(items: Vec<Value>) -> Vec<Value> {
    let mut records = Vec::with_capacity(items.len());

    for item in items {
        match validate_record(item) {
            Validity::Valid(record) => records.push(record),
            Validity::Invalid { reason } => {
                tracing::warn!(%reason, "skipping malformed record");
            }
        }
    }

    records
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
