// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job dispatch seam between the scheduler and the rest of the service.

use async_trait::async_trait;
use std::sync::Arc;
use tasse_core::SystemClock;
use tasse_engine::{JobRunner, TaskExecutor, TaskRegistry};
use tasse_store::JobRecord;

/// Routes fired jobs: task jobs go to the executor, the internal rescan
/// job re-runs reconciliation.
pub struct ServiceRunner {
    executor: Arc<TaskExecutor>,
    registry: Arc<TaskRegistry<SystemClock>>,
}

impl ServiceRunner {
    pub fn new(executor: Arc<TaskExecutor>, registry: Arc<TaskRegistry<SystemClock>>) -> Self {
        Self { executor, registry }
    }
}

#[async_trait]
impl JobRunner for ServiceRunner {
    async fn run(&self, job: JobRecord) {
        if job.id.is_rescan() {
            self.registry.reconcile().await;
            return;
        }

        let Some(kwargs) = job.kwargs else {
            tracing::warn!(job = %job.id, "job fired without bound arguments");
            return;
        };
        // Exit codes are informational and already logged by the executor;
        // definition and spawn failures end this run only.
        if let Err(e) = self.executor.run(&kwargs.task_name, &kwargs.metadata).await {
            tracing::warn!(task = %kwargs.task_name, error = %e, "task run failed");
        }
    }
}
