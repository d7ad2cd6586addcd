// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime environment provisioning.
//!
//! Decides per run how a task's dependencies are provided and prepares the
//! child environment accordingly. Detection order is fixed, first match
//! wins:
//!
//! 1. `requirements.txt` — build/reuse a task-scoped virtualenv and pip
//!    install into it.
//! 2. `pyproject.toml` — `poetry install` with the venvs root as poetry's
//!    virtualenvs path; execution later wraps through `poetry run`.
//! 3. neither — the host interpreter is used directly.
//!
//! Install steps stream their output through the task's log sink like any
//! task output. An install failure is logged but does not abort the run
//! attempt: the run then fails on its own and surfaces the real error.

use crate::paths;
use crate::process::{spawn_and_stream, CommandSpec};
use crate::sink::TaskLogger;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Dependency file that selects an isolated interpreter environment.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Project file that selects a managed-dependency environment.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Markers of the service's own runtime context, stripped from the
/// inherited environment so a task always starts clean.
const STRIPPED_VARS: &[&str] = &["VIRTUAL_ENV", "POETRY_ACTIVE"];

/// How a task's runtime environment is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    /// Host interpreter, no provisioning.
    Host,
    /// Task-scoped virtualenv built from `requirements.txt`.
    IsolatedInterpreter,
    /// Dependencies and invocation delegated to poetry.
    ManagedDependency,
}

/// Resolved runtime environment for one task run. Computed per run, never
/// persisted.
#[derive(Debug, Clone)]
pub struct ExecutionEnvironment {
    pub kind: EnvKind,
    /// Complete child environment.
    pub vars: HashMap<String, String>,
    /// Virtualenv directory when `kind` is `IsolatedInterpreter`.
    pub venv_dir: Option<PathBuf>,
}

/// Prepares runtime environments under a shared venvs root.
pub struct EnvironmentProvisioner {
    venvs_dir: PathBuf,
}

impl EnvironmentProvisioner {
    pub fn new(venvs_dir: impl Into<PathBuf>) -> Self {
        Self {
            venvs_dir: venvs_dir.into(),
        }
    }

    /// Decide the environment kind for a task directory.
    pub fn detect(task_dir: &Path) -> EnvKind {
        if task_dir.join(REQUIREMENTS_FILE).exists() {
            EnvKind::IsolatedInterpreter
        } else if task_dir.join(PYPROJECT_FILE).exists() {
            EnvKind::ManagedDependency
        } else {
            EnvKind::Host
        }
    }

    /// Prepare the runtime environment for `task_name` rooted at `task_dir`.
    pub async fn provision(
        &self,
        task_name: &str,
        task_dir: &Path,
        sink: &Arc<TaskLogger>,
    ) -> ExecutionEnvironment {
        let mut vars = base_env();
        match Self::detect(task_dir) {
            EnvKind::Host => ExecutionEnvironment {
                kind: EnvKind::Host,
                vars,
                venv_dir: None,
            },
            EnvKind::IsolatedInterpreter => {
                let venv = paths::venv_dir(&self.venvs_dir, task_name);
                vars.insert("VIRTUAL_ENV".to_string(), venv.display().to_string());

                let create = CommandSpec::new("virtualenv", [venv.display().to_string()]);
                self.install_step(&create, task_dir, &vars, sink).await;

                let pip = venv.join("bin").join("pip");
                let install = CommandSpec::new(
                    pip.display().to_string(),
                    ["install", "-r", REQUIREMENTS_FILE],
                );
                self.install_step(&install, task_dir, &vars, sink).await;

                ExecutionEnvironment {
                    kind: EnvKind::IsolatedInterpreter,
                    vars,
                    venv_dir: Some(venv),
                }
            }
            EnvKind::ManagedDependency => {
                vars.insert(
                    "POETRY_VIRTUALENVS_PATH".to_string(),
                    self.venvs_dir.display().to_string(),
                );

                let install = CommandSpec::new("poetry", ["install"]);
                self.install_step(&install, task_dir, &vars, sink).await;

                ExecutionEnvironment {
                    kind: EnvKind::ManagedDependency,
                    vars,
                    venv_dir: None,
                }
            }
        }
    }

    /// Run one install command, logging failures without propagating them.
    async fn install_step(
        &self,
        spec: &CommandSpec,
        task_dir: &Path,
        vars: &HashMap<String, String>,
        sink: &Arc<TaskLogger>,
    ) {
        match spawn_and_stream(spec, task_dir, vars, sink, None).await {
            Ok(0) => {}
            Ok(code) => {
                sink.info(&format!(
                    "provisioning step '{}' exited with status code {}",
                    spec.display(),
                    code
                ));
            }
            Err(e) => {
                sink.info(&format!("provisioning step failed: {e}"));
                tracing::warn!(command = %spec.display(), error = %e, "provisioning step failed");
            }
        }
    }
}

/// Inherited environment minus the service's own runtime markers.
fn base_env() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| !STRIPPED_VARS.contains(&key.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
