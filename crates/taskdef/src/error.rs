// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from loading task definitions.

use std::path::PathBuf;
use tasse_core::TriggerError;
use thiserror::Error;

/// A task-scoped definition failure. Each of these aborts loading of the
/// one task it occurred in, never the scan of the others.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("task.yaml requires scheduler.trigger")]
    MissingTrigger,
    #[error(transparent)]
    Trigger(#[from] TriggerError),
    #[error("task directory name is not valid UTF-8: {0}")]
    InvalidName(PathBuf),
    #[error("no entrypoint found")]
    NoEntrypoint,
    #[error("unsupported entrypoint extension: {0}")]
    UnsupportedEntrypoint(String),
}
