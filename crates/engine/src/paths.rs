// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared path builders for task, log, and venv directories.
//!
//! Used by the executor, the sinks, and the provisioner so all agree on
//! the layout under the data root:
//!   `<data>/tasks/<name>/`
//!   `<data>/logs/<name>/log.txt`
//!   `<data>/venvs/<name>/`

use std::path::{Path, PathBuf};

/// Directory of the task named `name`.
pub fn task_dir(tasks_dir: &Path, name: &str) -> PathBuf {
    tasks_dir.join(name)
}

/// Log directory of the task named `name`.
pub fn task_log_dir(logs_dir: &Path, name: &str) -> PathBuf {
    logs_dir.join(name)
}

/// Isolated interpreter environment of the task named `name`.
pub fn venv_dir(venvs_dir: &Path, name: &str) -> PathBuf {
    venvs_dir.join(name)
}
