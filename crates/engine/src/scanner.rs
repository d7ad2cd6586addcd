// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory reconciliation.
//!
//! `reconcile()` diffs the task directories against the scheduled-job set
//! and applies the difference: new tasks are registered (job + log sink),
//! modified tasks are re-registered (job replaced, sink reused), vanished
//! tasks are dropped (job and sink removed). A task that fails to load is
//! skipped for the pass and its existing job, if any, is left untouched:
//! failure to reload is not removal.
//!
//! Passes are serialized: the periodic driver job and API-triggered
//! rescans never overlap. With no filesystem change a pass performs zero
//! mutations.

use crate::scheduler::Scheduler;
use crate::sink::SinkRegistry;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tasse_core::{Clock, JobId};
use tasse_store::{JobKwargs, JobRecord};
use tasse_taskdef::{list_task_dirs, load_task, DefinitionError};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Tasks registered for the first time.
    pub added: usize,
    /// Tasks whose job was replaced after a metadata change.
    pub updated: usize,
    /// Tasks removed because their directory disappeared.
    pub removed: usize,
    /// Tasks skipped because their definition failed to load.
    pub failed: usize,
}

impl ScanSummary {
    /// True if the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Reconciles on-disk task definitions with the live scheduled-job set and
/// owns the log-sink lifecycle.
pub struct TaskRegistry<C: Clock> {
    tasks_dir: PathBuf,
    scheduler: Arc<Scheduler<C>>,
    sinks: Arc<SinkRegistry>,
    clock: C,
    /// Serializes reconciliation passes.
    scan_lock: tokio::sync::Mutex<()>,
}

impl<C: Clock> TaskRegistry<C> {
    pub fn new(
        tasks_dir: impl Into<PathBuf>,
        scheduler: Arc<Scheduler<C>>,
        sinks: Arc<SinkRegistry>,
        clock: C,
    ) -> Self {
        Self {
            tasks_dir: tasks_dir.into(),
            scheduler,
            sinks,
            clock,
            scan_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// One reconciliation pass over the task root.
    pub async fn reconcile(&self) -> ScanSummary {
        let _guard = self.scan_lock.lock().await;
        let mut summary = ScanSummary::default();

        let dirs = match list_task_dirs(&self.tasks_dir) {
            Ok(dirs) => dirs,
            Err(e) => {
                tracing::error!(
                    tasks_dir = %self.tasks_dir.display(),
                    error = %e,
                    "unable to list task directories"
                );
                return summary;
            }
        };

        // Directory basenames found this pass. A task that fails to load
        // still counts as present: failure to reload is not removal.
        let mut present: HashSet<String> = HashSet::new();
        for dir in dirs {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(String::from) else {
                tracing::warn!(path = %dir.display(), "skipping non-UTF-8 task directory");
                continue;
            };
            present.insert(name.clone());
            if let Err(e) = self.ensure_task(&name, &dir, &mut summary) {
                summary.failed += 1;
                tracing::warn!(task = %name, error = %e, "unable to load task");
            }
        }

        // Tasks whose directory disappeared: drop job and sink.
        for job in self.scheduler.list_all() {
            let Some(task_name) = job.id.task_name().map(String::from) else {
                continue;
            };
            if present.contains(&task_name) {
                continue;
            }
            tracing::warn!(task = %task_name, "task removed");
            match self.scheduler.remove(&job.id) {
                Ok(_) => summary.removed += 1,
                Err(e) => {
                    tracing::error!(task = %task_name, error = %e, "failed to remove job")
                }
            }
            self.sinks.remove(&task_name);
        }

        if !summary.is_noop() {
            tracing::info!(
                added = summary.added,
                updated = summary.updated,
                removed = summary.removed,
                failed = summary.failed,
                "reconciliation complete"
            );
        }
        summary
    }

    /// Register or refresh one task. Load failures propagate to the caller;
    /// store failures are logged and retried on the next pass.
    fn ensure_task(
        &self,
        name: &str,
        dir: &std::path::Path,
        summary: &mut ScanSummary,
    ) -> Result<(), DefinitionError> {
        let def = load_task(dir)?;
        let id = JobId::for_task(name);

        let existing = self.scheduler.get(&id);
        let mut modified = false;
        if let Some(job) = &existing {
            let unchanged = job
                .kwargs
                .as_ref()
                .is_some_and(|k| k.metadata == def.metadata);
            if unchanged {
                return Ok(());
            }
            tracing::info!(task = %name, "task modified");
            if let Err(e) = self.scheduler.remove(&id) {
                tracing::error!(task = %name, error = %e, "failed to remove outdated job");
                return Ok(());
            }
            modified = true;
        }

        if !modified {
            tracing::info!(task = %name, trigger = ?def.trigger, "task detected");
            // First-time registration creates the log sink; a
            // modification reuses the existing one.
            self.sinks.ensure(name);
        }

        let next = def.trigger.next_fire_after(self.clock.now_utc());
        let record = JobRecord::new(
            id,
            name,
            def.trigger.clone(),
            Some(JobKwargs {
                task_name: name.to_string(),
                metadata: def.metadata.clone(),
            }),
            next,
        );
        match self.scheduler.add_or_replace(record) {
            Ok(()) => {
                if modified {
                    summary.updated += 1;
                } else {
                    summary.added += 1;
                }
            }
            Err(e) => {
                tracing::error!(task = %name, error = %e, "failed to register job");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
