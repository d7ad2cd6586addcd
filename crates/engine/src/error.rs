// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for provisioning and execution.

use std::time::Duration;
use tasse_taskdef::DefinitionError;
use thiserror::Error;

/// Errors from running a task (or an install step) as a child process.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command}' timed out after {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
