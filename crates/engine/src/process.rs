// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess spawn-and-stream helpers.
//!
//! Children run with a fully explicit environment and their stdout/stderr
//! piped. Both streams are forwarded line-by-line into the task's log sink
//! as output arrives, so long-running tasks produce live logs rather than
//! one batch at exit.

use crate::error::ExecuteError;
use crate::sink::TaskLogger;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// A fully resolved child-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// One-line rendering for log output.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Spawn `spec` in `cwd` with exactly `env`, forward each output line to
/// `sink`, and wait for exit. Returns the child's exit code (-1 when the
/// child was killed by a signal).
///
/// `timeout` bounds the whole run; `None` runs to completion. No caller
/// currently passes a bound, but the cancellation point lives here so one
/// can be added without restructuring the executor.
pub async fn spawn_and_stream(
    spec: &CommandSpec,
    cwd: &Path,
    env: &HashMap<String, String>,
    sink: &Arc<TaskLogger>,
    timeout: Option<Duration>,
) -> Result<i32, ExecuteError> {
    sink.info(&format!("[Run {}]", spec.display()));

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(cwd)
        .env_clear()
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExecuteError::Spawn {
            command: spec.display(),
            source,
        })?;

    let out_reader = forward_lines(child.stdout.take(), Arc::clone(sink));
    let err_reader = forward_lines(child.stderr.take(), Arc::clone(sink));

    let status = match timeout {
        Some(bound) => match tokio::time::timeout(bound, child.wait()).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                let _ = child.kill().await;
                return Err(ExecuteError::Timeout {
                    command: spec.display(),
                    timeout: bound,
                });
            }
        },
        None => child.wait().await?,
    };

    // Drain both readers so no tail output is lost before reporting exit.
    let _ = out_reader.await;
    let _ = err_reader.await;

    Ok(status.code().unwrap_or(-1))
}

fn forward_lines<R>(stream: Option<R>, sink: Arc<TaskLogger>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(stream) = stream else { return };
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            sink.info(line.trim_end());
        }
    })
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
