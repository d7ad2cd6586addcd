// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical task metadata snapshot.
//!
//! The full manifest document is held as a `serde_json::Value` whose maps
//! are BTreeMap-backed, so two snapshots compare equal whenever they carry
//! the same content, regardless of key order or source formatting. This is
//! what makes modification detection across rescans well-defined.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order-independent snapshot of a task's manifest document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Value);

impl Metadata {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a top-level field of the document.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The explicit entrypoint filename, if the manifest names one.
    pub fn entrypoint(&self) -> Option<&str> {
        self.get("entrypoint").and_then(Value::as_str)
    }
}

impl From<Value> for Metadata {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
