// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier type.
//!
//! Job ids are scheme-prefixed strings: jobs owned by a task directory use
//! `tasks:<name>`, while service-internal jobs (the periodic rescan) use a
//! private scheme that never collides with a task name.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Scheme prefix for jobs derived from a task directory.
const TASK_SCHEME: &str = "tasks:";

/// Id of the internal job that drives periodic reconciliation.
const RESCAN_ID: &str = "internal:rescan";

/// Unique identifier for a scheduled job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a JobId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this JobId.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Job id for the task named `name`.
    pub fn for_task(name: &str) -> Self {
        Self::new(format!("{TASK_SCHEME}{name}"))
    }

    /// Job id of the internal rescan driver.
    pub fn rescan() -> Self {
        Self::new(RESCAN_ID)
    }

    /// Returns true if this id follows the task-job scheme.
    pub fn is_task_job(&self) -> bool {
        self.0.starts_with(TASK_SCHEME)
    }

    /// Returns true if this is the internal rescan job.
    pub fn is_rescan(&self) -> bool {
        self.0 == RESCAN_ID
    }

    /// Extracts the task name if this id follows the task-job scheme.
    pub fn task_name(&self) -> Option<&str> {
        self.0.strip_prefix(TASK_SCHEME)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
