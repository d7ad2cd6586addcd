// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tasse-taskdef: Task definition loading.
//!
//! A task is a directory whose basename is the task name, carrying a
//! `task.yaml` manifest, an optional dependency file, and an entrypoint
//! script. This crate parses manifests, discovers task directories, and
//! resolves entrypoints; it knows nothing about scheduling or execution.

pub mod discovery;
pub mod entrypoint;
pub mod error;
pub mod manifest;

pub use discovery::{list_task_dirs, load_task, TaskDefinition};
pub use entrypoint::{resolve_entrypoint, Entrypoint, EntrypointKind};
pub use error::DefinitionError;
pub use manifest::{SchedulerSpec, TaskManifest, MANIFEST_FILE};
