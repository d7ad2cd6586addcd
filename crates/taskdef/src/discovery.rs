// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task directory discovery and definition loading.

use crate::error::DefinitionError;
use crate::manifest::{TaskManifest, MANIFEST_FILE};
use std::path::{Path, PathBuf};
use tasse_core::{Metadata, Trigger};

/// A task definition freshly loaded from disk.
///
/// Never mutated in place: a changed on-disk manifest produces a new value
/// on the next scan, and `metadata` equality decides whether the scheduled
/// job must be replaced.
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    /// Task name (directory basename, unique under the task root).
    pub name: String,
    /// The task directory.
    pub dir: PathBuf,
    pub manifest: TaskManifest,
    /// Canonical snapshot of the whole manifest document.
    pub metadata: Metadata,
    pub trigger: Trigger,
}

/// Load the task defined in `dir`.
pub fn load_task(dir: &Path) -> Result<TaskDefinition, DefinitionError> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DefinitionError::InvalidName(dir.to_path_buf()))?
        .to_string();

    let path = dir.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&path).map_err(|source| DefinitionError::Unreadable {
        path: path.clone(),
        source,
    })?;

    let manifest: TaskManifest =
        serde_yaml::from_str(&content).map_err(|e| DefinitionError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    // A second pass into a canonical value; this is what change detection
    // compares, so it must not depend on field order.
    let document: serde_json::Value =
        serde_yaml::from_str(&content).map_err(|e| DefinitionError::Parse {
            path,
            reason: e.to_string(),
        })?;

    let kind = manifest
        .scheduler
        .trigger
        .as_deref()
        .ok_or(DefinitionError::MissingTrigger)?;
    let trigger = Trigger::parse(kind, &manifest.scheduler.options)?;

    Ok(TaskDefinition {
        name,
        dir: dir.to_path_buf(),
        manifest,
        metadata: Metadata::new(document),
        trigger,
    })
}

/// List task subdirectories of `tasks_dir` in name order.
///
/// A missing task root is an empty listing, not an error. Plain files are
/// ignored.
pub fn list_task_dirs(tasks_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !tasks_dir.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(tasks_dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
