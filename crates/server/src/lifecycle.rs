// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service lifecycle: startup, shutdown, single-instance locking.

use crate::config::Config;
use crate::runner::ServiceRunner;
use fs2::FileExt;
use std::fs::{self, File};
use std::io::Write;
use std::sync::Arc;
use tasse_core::{Clock, JobId, SystemClock, Trigger};
use tasse_engine::{JobRunner, Scheduler, SinkRegistry, TaskExecutor, TaskRegistry};
use tasse_store::{JobRecord, JobStore, StoreError};
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Lifecycle errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("failed to acquire lock: service already running?")]
    LockFailed(#[source] std::io::Error),
    #[error("invalid bind address '{value}': {reason}")]
    BadBindAddr { value: String, reason: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("scheduler error: {0}")]
    Scheduler(#[from] tasse_engine::SchedulerError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Running service state.
///
/// Everything the control surface and dispatch loop need lives here (the
/// scheduler handle, the reconciler, the lock file), with an explicit
/// startup and teardown instead of free-floating globals.
pub struct Service {
    pub config: Config,
    // NOTE(lifetime): Held to maintain the exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub scheduler: Arc<Scheduler<SystemClock>>,
    pub registry: Arc<TaskRegistry<SystemClock>>,
    pub runner: Arc<dyn JobRunner>,
    /// Signals the dispatch loop to stop.
    pub shutdown: Arc<Notify>,
}

/// Start the service: acquire the lock, open the store, register the
/// rescan driver, run one synchronous reconciliation, and assemble the
/// shared context. The dispatch loop is spawned separately so tests can
/// drive dispatching by hand.
pub async fn startup(config: &Config) -> Result<Service, LifecycleError> {
    fs::create_dir_all(&config.tasks_dir)?;
    fs::create_dir_all(&config.logs_dir)?;
    fs::create_dir_all(&config.venvs_dir)?;

    let mut lock_file = File::create(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    writeln!(lock_file, "{}", std::process::id())?;

    let store = JobStore::open(&config.store_path)?;
    for job in store.list() {
        tracing::debug!(job = %job.id, next_fire = ?job.next_fire_at, "loaded job");
    }

    let clock = SystemClock;
    let scheduler = Arc::new(Scheduler::new(store, clock));
    let sinks = Arc::new(SinkRegistry::new(&config.logs_dir));
    let executor = Arc::new(TaskExecutor::new(
        &config.tasks_dir,
        &config.venvs_dir,
        Arc::clone(&sinks),
    ));
    let registry = Arc::new(TaskRegistry::new(
        &config.tasks_dir,
        Arc::clone(&scheduler),
        sinks,
        clock,
    ));

    ensure_rescan_job(&scheduler, config, &clock)?;
    registry.reconcile().await;

    let runner: Arc<dyn JobRunner> =
        Arc::new(ServiceRunner::new(executor, Arc::clone(&registry)));

    Ok(Service {
        config: config.clone(),
        lock_file,
        scheduler,
        registry,
        runner,
        shutdown: Arc::new(Notify::new()),
    })
}

/// Register (or refresh) the internal job that drives periodic
/// reconciliation. Its id deliberately does not follow the task-job
/// scheme, so the removal pass never touches it.
fn ensure_rescan_job(
    scheduler: &Scheduler<SystemClock>,
    config: &Config,
    clock: &SystemClock,
) -> Result<(), LifecycleError> {
    let trigger = Trigger::Interval {
        secs: config.scan_interval.as_secs().max(1),
    };
    let next = trigger.next_fire_after(clock.now_utc());
    scheduler.add_or_replace(JobRecord::new(
        JobId::rescan(),
        "rescan",
        trigger,
        None,
        next,
    ))?;
    Ok(())
}

impl Service {
    /// Spawn the dispatch loop onto the runtime.
    pub fn spawn_dispatch_loop(&self) {
        let scheduler = Arc::clone(&self.scheduler);
        let runner = Arc::clone(&self.runner);
        let shutdown = Arc::clone(&self.shutdown);
        tokio::spawn(async move {
            scheduler.run_dispatch_loop(runner, shutdown).await;
        });
    }

    /// Stop the dispatch loop and release the single-instance lock.
    ///
    /// In-flight task processes run to completion on their own; there is
    /// no cancellation primitive for a dispatched run.
    pub fn shutdown(&self) {
        info!("shutting down");
        self.shutdown.notify_waiters();
        if self.config.lock_path.exists() {
            if let Err(e) = fs::remove_file(&self.config.lock_path) {
                warn!(error = %e, "failed to remove lock file");
            }
        }
        info!("shutdown complete");
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
