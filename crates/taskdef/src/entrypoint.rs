// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entrypoint resolution.
//!
//! The manifest's explicit `entrypoint` always wins. Without one, a fixed
//! list of conventional filenames is probed in order and the first that
//! exists on disk is used.

use crate::error::DefinitionError;
use std::path::{Path, PathBuf};

/// Conventional entrypoint filenames, probed in order.
const AUTO_ENTRYPOINTS: &[&str] = &["task.py", "task.sh"];

/// How an entrypoint file is invoked, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrypointKind {
    /// Runs through a Python interpreter.
    Python,
    /// Runs through `bash -x`.
    Shell,
}

/// A resolved entrypoint within a task directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrypoint {
    /// Filename relative to the task directory.
    pub file: String,
    pub kind: EntrypointKind,
}

impl Entrypoint {
    /// Absolute path of the entrypoint file under `task_dir`.
    pub fn path(&self, task_dir: &Path) -> PathBuf {
        task_dir.join(&self.file)
    }
}

/// Resolve the entrypoint for a task directory.
///
/// An explicit filename is taken at face value; if it does not exist the
/// run itself will fail, which surfaces the real error in the task log.
pub fn resolve_entrypoint(
    task_dir: &Path,
    explicit: Option<&str>,
) -> Result<Entrypoint, DefinitionError> {
    if let Some(file) = explicit {
        return classify(file);
    }
    for candidate in AUTO_ENTRYPOINTS {
        if task_dir.join(candidate).exists() {
            return classify(candidate);
        }
    }
    Err(DefinitionError::NoEntrypoint)
}

fn classify(file: &str) -> Result<Entrypoint, DefinitionError> {
    let kind = match Path::new(file).extension().and_then(|e| e.to_str()) {
        Some("py") => EntrypointKind::Python,
        Some("sh") => EntrypointKind::Shell,
        _ => return Err(DefinitionError::UnsupportedEntrypoint(file.to_string())),
    };
    Ok(Entrypoint {
        file: file.to_string(),
        kind,
    })
}

#[cfg(test)]
#[path = "entrypoint_tests.rs"]
mod tests;
