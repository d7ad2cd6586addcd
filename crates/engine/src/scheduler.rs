// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job scheduling: store wrapper, worker pool, and dispatch loop.
//!
//! The dispatch loop ticks once per second, collects jobs whose fire time
//! has passed (in firing-time order), and admits them to a bounded worker
//! pool. Two caps apply: at most [`MAX_DISPATCH_PER_TICK`] jobs enter the
//! pool per tick, and `max_instances = 1` per job means a firing whose
//! previous instance is still running is skipped, not queued. Fire times
//! advance from the scheduled time rather than from "now", so backlogged
//! firings are attempted one by one instead of being collapsed.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tasse_core::{Clock, JobId};
use tasse_store::{JobRecord, JobStore, StoreError};
use thiserror::Error;
use tokio::sync::{Notify, Semaphore};

/// Fixed worker-pool capacity.
pub const POOL_CAPACITY: usize = 5;

/// Pool-wide cap on jobs admitted in a single dispatch pass.
pub const MAX_DISPATCH_PER_TICK: usize = 3;

/// Dispatch clock resolution.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Executes jobs fired by the scheduler. The server wires task jobs to the
/// task executor and the internal rescan job to the reconciler.
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    async fn run(&self, job: JobRecord);
}

/// Errors from scheduler operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no such job: {0}")]
    NotFound(JobId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the durable job store and the bounded worker pool.
pub struct Scheduler<C: Clock> {
    store: Mutex<JobStore>,
    /// Jobs with an instance currently in the pool.
    running: Arc<Mutex<HashSet<JobId>>>,
    pool: Arc<Semaphore>,
    clock: C,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(store: JobStore, clock: C) -> Self {
        Self {
            store: Mutex::new(store),
            running: Arc::new(Mutex::new(HashSet::new())),
            pool: Arc::new(Semaphore::new(POOL_CAPACITY)),
            clock,
        }
    }

    /// Insert a job record, replacing any existing record with the same id.
    pub fn add_or_replace(&self, record: JobRecord) -> Result<(), SchedulerError> {
        self.store.lock().insert(record)?;
        Ok(())
    }

    /// Remove a job record. Absent ids are a no-op.
    pub fn remove(&self, id: &JobId) -> Result<Option<JobRecord>, SchedulerError> {
        Ok(self.store.lock().remove(id)?)
    }

    pub fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.store.lock().get(id).cloned()
    }

    pub fn list_all(&self) -> Vec<JobRecord> {
        self.store.lock().list()
    }

    /// Reschedule `id` to fire immediately. Trigger and kwargs are left
    /// untouched; the normal dispatch loop picks the job up on its next
    /// tick.
    pub fn fire_now(&self, id: &JobId) -> Result<(), SchedulerError> {
        let mut store = self.store.lock();
        if store.get(id).is_none() {
            return Err(SchedulerError::NotFound(id.clone()));
        }
        store.update_next_fire(id, Some(self.clock.now_utc()))?;
        Ok(())
    }

    /// Jobs due at or before now, in firing-time order.
    pub fn due_jobs(&self) -> Vec<JobRecord> {
        let now = self.clock.now_utc();
        let mut due: Vec<JobRecord> = self
            .store
            .lock()
            .list()
            .into_iter()
            .filter(|j| j.is_due(now))
            .collect();
        due.sort_by_key(|j| j.next_fire_at);
        due
    }

    /// True if an instance of `id` is currently admitted to the pool.
    pub fn is_running(&self, id: &JobId) -> bool {
        self.running.lock().contains(id)
    }

    /// One dispatch pass. Returns the number of jobs admitted to the pool.
    pub fn dispatch_due(&self, runner: &Arc<dyn JobRunner>) -> usize {
        let mut dispatched = 0;
        for job in self.due_jobs() {
            if dispatched >= MAX_DISPATCH_PER_TICK {
                break;
            }

            // This firing is consumed either way; advance from the
            // scheduled time so a backlog drains firing by firing.
            let fire_time = job.next_fire_at.unwrap_or_else(|| self.clock.now_utc());
            let next = job.trigger.next_fire_after(fire_time);
            if let Err(e) = self.store.lock().update_next_fire(&job.id, next) {
                tracing::error!(job = %job.id, error = %e, "failed to advance fire time");
                continue;
            }

            if !self.running.lock().insert(job.id.clone()) {
                tracing::warn!(
                    job = %job.id,
                    "skipping firing: previous instance still running"
                );
                continue;
            }

            let id = job.id.clone();
            let pool = Arc::clone(&self.pool);
            let running = Arc::clone(&self.running);
            let runner = Arc::clone(runner);
            tokio::spawn(async move {
                let Ok(_permit) = pool.acquire_owned().await else {
                    // Pool closed; only happens at teardown.
                    running.lock().remove(&id);
                    return;
                };
                runner.run(job).await;
                running.lock().remove(&id);
            });
            dispatched += 1;
        }
        dispatched
    }

    /// Dispatch loop: one pass per tick until `shutdown` is notified.
    pub async fn run_dispatch_loop(&self, runner: Arc<dyn JobRunner>, shutdown: Arc<Notify>) {
        // Created outside the loop so ticks keep their cadence across
        // select iterations.
        let mut tick = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.dispatch_due(&runner);
                }
                _ = shutdown.notified() => {
                    tracing::info!("dispatch loop stopping");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
