// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-task log sinks.
//!
//! Each task gets one append-only log file under `logs/<name>/log.txt`,
//! written a line at a time as output arrives. The active file is rotated
//! once it exceeds the size limit, and rotated files past the retention
//! window are pruned on the next rotation.
//!
//! Each `info()` call opens, writes, and closes the file. Per-job
//! `max_instances = 1` means a sink has at most one writer at a time, so
//! no locking is needed at the file level.

use crate::paths;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Size of the active log file that triggers rotation.
const MAX_LOG_BYTES: u64 = 50 * 1024 * 1024;

/// How long rotated log files are kept.
const RETENTION: Duration = Duration::from_secs(15 * 24 * 60 * 60);

/// Append-only log destination for one task.
///
/// Write failures are logged via tracing but do not propagate — logging
/// must not break the engine.
pub struct TaskLogger {
    task_name: String,
    dir: PathBuf,
    max_bytes: u64,
    retention: Duration,
}

impl TaskLogger {
    pub fn new(logs_dir: &Path, task_name: &str) -> Self {
        Self::with_limits(logs_dir, task_name, MAX_LOG_BYTES, RETENTION)
    }

    /// Constructor with explicit rotation limits, for tests.
    pub fn with_limits(
        logs_dir: &Path,
        task_name: &str,
        max_bytes: u64,
        retention: Duration,
    ) -> Self {
        Self {
            task_name: task_name.to_string(),
            dir: paths::task_log_dir(logs_dir, task_name),
            max_bytes,
            retention,
        }
    }

    /// Append one line: `<utc-timestamp> | <message>`.
    pub fn info(&self, message: &str) {
        if let Err(e) = self.append(message) {
            tracing::warn!(
                task = %self.task_name,
                error = %e,
                "failed to write task log"
            );
        }
    }

    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.dir.join("log.txt")
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        self.rotate_if_needed()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        let ts = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        writeln!(file, "{} | {}", ts, message)?;
        Ok(())
    }

    fn rotate_if_needed(&self) -> std::io::Result<()> {
        let path = self.path();
        let size = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if size < self.max_bytes {
            return Ok(());
        }
        let rotated = self
            .dir
            .join(format!("log.{}.txt", Utc::now().format("%Y%m%d%H%M%S%3f")));
        fs::rename(&path, rotated)?;
        self.prune_rotated();
        Ok(())
    }

    /// Remove rotated files older than the retention window. Best effort.
    fn prune_rotated(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name == "log.txt" || !name.starts_with("log.") || !name.ends_with(".txt") {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|mtime| mtime.elapsed().ok())
                .is_some_and(|age| age > self.retention);
            if expired {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

/// Registry of per-task log sinks. At most one sink exists per task name;
/// it is created when the task is first registered and dropped when the
/// task is removed. Mutated only by the reconciler, which runs one pass
/// at a time.
pub struct SinkRegistry {
    logs_dir: PathBuf,
    sinks: Mutex<HashMap<String, Arc<TaskLogger>>>,
}

impl SinkRegistry {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// Get the sink for `task_name`, creating it if absent.
    pub fn ensure(&self, task_name: &str) -> Arc<TaskLogger> {
        let mut sinks = self.sinks.lock();
        Arc::clone(
            sinks
                .entry(task_name.to_string())
                .or_insert_with(|| Arc::new(TaskLogger::new(&self.logs_dir, task_name))),
        )
    }

    pub fn get(&self, task_name: &str) -> Option<Arc<TaskLogger>> {
        self.sinks.lock().get(task_name).cloned()
    }

    /// Drop the sink for `task_name`. Returns true if one existed.
    pub fn remove(&self, task_name: &str) -> bool {
        self.sinks.lock().remove(task_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
