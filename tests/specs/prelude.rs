//! Shared fixtures for the behavioral specs.

use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tasse_core::{FakeClock, JobId};
use tasse_engine::{
    JobRunner, ScanSummary, Scheduler, SinkRegistry, TaskExecutor, TaskRegistry,
};
use tasse_store::{JobRecord, JobStore};
use tempfile::TempDir;

/// A complete service world rooted in a temp directory.
pub struct World {
    pub tasks_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub store_path: PathBuf,
    pub scheduler: Arc<Scheduler<FakeClock>>,
    pub registry: Arc<TaskRegistry<FakeClock>>,
    pub executor: Arc<TaskExecutor>,
    _data: TempDir,
}

impl World {
    pub fn new() -> Self {
        let data = tempfile::tempdir().unwrap();
        let tasks_dir = data.path().join("tasks");
        let logs_dir = data.path().join("logs");
        let venvs_dir = data.path().join("venvs");
        let store_path = data.path().join("jobs.json");
        fs::create_dir_all(&tasks_dir).unwrap();

        let clock = FakeClock::new();
        let store = JobStore::open(&store_path).unwrap();
        let scheduler = Arc::new(Scheduler::new(store, clock.clone()));
        let sinks = Arc::new(SinkRegistry::new(&logs_dir));
        let executor = Arc::new(TaskExecutor::new(
            &tasks_dir,
            &venvs_dir,
            Arc::clone(&sinks),
        ));
        let registry = Arc::new(TaskRegistry::new(
            &tasks_dir,
            Arc::clone(&scheduler),
            Arc::clone(&sinks),
            clock.clone(),
        ));

        Self {
            tasks_dir,
            logs_dir,
            store_path,
            scheduler,
            registry,
            executor,
            _data: data,
        }
    }

    /// Create or overwrite a task directory with a manifest and a shell
    /// entrypoint.
    pub fn write_task(&self, name: &str, manifest: &str, script: &str) {
        let dir = self.tasks_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("task.yaml"), manifest).unwrap();
        fs::write(dir.join("task.sh"), script).unwrap();
    }

    pub fn remove_task(&self, name: &str) {
        fs::remove_dir_all(self.tasks_dir.join(name)).unwrap();
    }

    pub async fn reconcile(&self) -> ScanSummary {
        self.registry.reconcile().await
    }

    pub fn job(&self, name: &str) -> Option<JobRecord> {
        self.scheduler.get(&JobId::for_task(name))
    }

    pub fn task_log(&self, name: &str) -> String {
        fs::read_to_string(self.logs_dir.join(name).join("log.txt")).unwrap_or_default()
    }

    /// A runner that executes task jobs exactly like the service does.
    pub fn exec_runner(&self) -> Arc<dyn JobRunner> {
        Arc::new(ExecRunner {
            executor: Arc::clone(&self.executor),
        })
    }

    /// Wait until the task log satisfies `pred`, or panic after ~2s.
    pub async fn wait_for_log(&self, name: &str, pred: impl Fn(&str) -> bool) {
        for _ in 0..100 {
            if pred(&self.task_log(name)) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("log for task '{name}' never converged: {}", self.task_log(name));
    }
}

struct ExecRunner {
    executor: Arc<TaskExecutor>,
}

#[async_trait]
impl JobRunner for ExecRunner {
    async fn run(&self, job: JobRecord) {
        let Some(kwargs) = job.kwargs else { return };
        let _ = self
            .executor
            .run(&kwargs.task_name, &kwargs.metadata)
            .await;
    }
}

pub const INTERVAL_HOURLY: &str = "scheduler:\n  trigger: interval\n  hours: 1\n";
