// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task execution.
//!
//! One `run()` call is one task instance: resolve the entrypoint, provision
//! the runtime environment, resolve the concrete invocation once from
//! (entrypoint kind × environment kind), then spawn and stream until exit.
//! A non-zero exit code is reported to the log stream and the caller, never
//! escalated.

use crate::environment::{EnvKind, EnvironmentProvisioner, ExecutionEnvironment};
use crate::error::ExecuteError;
use crate::paths;
use crate::process::{spawn_and_stream, CommandSpec};
use crate::sink::SinkRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tasse_core::Metadata;
use tasse_taskdef::{resolve_entrypoint, Entrypoint, EntrypointKind};

/// Executes task runs end to end.
pub struct TaskExecutor {
    tasks_dir: PathBuf,
    provisioner: EnvironmentProvisioner,
    sinks: Arc<SinkRegistry>,
}

impl TaskExecutor {
    pub fn new(
        tasks_dir: impl Into<PathBuf>,
        venvs_dir: impl Into<PathBuf>,
        sinks: Arc<SinkRegistry>,
    ) -> Self {
        Self {
            tasks_dir: tasks_dir.into(),
            provisioner: EnvironmentProvisioner::new(venvs_dir),
            sinks,
        }
    }

    /// Run one instance of `task_name` to completion; returns its exit code.
    pub async fn run(&self, task_name: &str, metadata: &Metadata) -> Result<i32, ExecuteError> {
        let task_dir = paths::task_dir(&self.tasks_dir, task_name);
        let entrypoint = resolve_entrypoint(&task_dir, metadata.entrypoint())?;
        let sink = self.sinks.ensure(task_name);

        sink.info(&format!(">>> Task {}/{}", task_name, entrypoint.file));

        let env = self
            .provisioner
            .provision(task_name, &task_dir, &sink)
            .await;
        let spec = build_command(&entrypoint, &env);
        tracing::debug!(task = task_name, command = %spec.display(), "running task");

        let code = spawn_and_stream(&spec, &task_dir, &env.vars, &sink, None).await?;

        sink.info(&format!(
            "<<< Task {}/{} ended with status code {}",
            task_name, entrypoint.file, code
        ));
        if code != 0 {
            tracing::warn!(task = task_name, code, "task exited non-zero");
        }
        Ok(code)
    }
}

/// Resolve the concrete invocation for an entrypoint under an environment.
///
/// Python entrypoints pick their interpreter by environment kind: the venv
/// interpreter, the `poetry run` wrapper, or the bare host `python`, in
/// that priority. Shell entrypoints always run `bash -x` so the trace ends
/// up in the task log.
pub fn build_command(entrypoint: &Entrypoint, env: &ExecutionEnvironment) -> CommandSpec {
    match entrypoint.kind {
        EntrypointKind::Python => match (env.kind, &env.venv_dir) {
            (EnvKind::IsolatedInterpreter, Some(venv)) => CommandSpec::new(
                venv.join("bin").join("python").display().to_string(),
                [entrypoint.file.clone()],
            ),
            (EnvKind::ManagedDependency, _) => {
                CommandSpec::new("poetry", ["run", "python", entrypoint.file.as_str()])
            }
            _ => CommandSpec::new("python", [entrypoint.file.clone()]),
        },
        EntrypointKind::Shell => CommandSpec::new("bash", ["-x", entrypoint.file.as_str()]),
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
