// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled-job records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasse_core::{JobId, Metadata, Trigger};

/// Arguments bound to a job when it is registered. The metadata snapshot
/// doubles as the change detector: reconciliation compares it against the
/// freshly loaded manifest to decide whether the job must be replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobKwargs {
    pub task_name: String,
    pub metadata: Metadata,
}

/// A durable scheduled-job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    /// Human-readable job name (the task name for task jobs).
    pub name: String,
    pub trigger: Trigger,
    /// Bound arguments; `None` for service-internal jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<JobKwargs>,
    /// Next scheduled fire time. `None` marks an exhausted one-shot job:
    /// it stays registered (so rescans do not re-add it) but never fires.
    pub next_fire_at: Option<DateTime<Utc>>,
    /// Concurrent instances allowed for this job.
    pub max_instances: u32,
    /// Whether backlogged firings collapse into one.
    pub coalesce: bool,
}

impl JobRecord {
    /// New record with the service defaults: single instance, no coalescing.
    pub fn new(
        id: JobId,
        name: impl Into<String>,
        trigger: Trigger,
        kwargs: Option<JobKwargs>,
        next_fire_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            trigger,
            kwargs,
            next_fire_at,
            max_instances: 1,
            coalesce: false,
        }
    }

    /// True if this job is due at or before `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_fire_at.is_some_and(|t| t <= now)
    }
}
