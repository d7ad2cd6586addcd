// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `task.yaml` manifest schema.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Manifest filename inside each task directory.
pub const MANIFEST_FILE: &str = "task.yaml";

/// Parsed task manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskManifest {
    /// Entrypoint filename. When absent, conventional names are probed.
    #[serde(default)]
    pub entrypoint: Option<String>,
    /// Scheduling section; required.
    pub scheduler: SchedulerSpec,
}

/// The `scheduler` object: a trigger kind plus kind-specific options that
/// are passed through to the trigger parser opaquely.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSpec {
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}
