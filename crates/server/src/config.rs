// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration.
//!
//! All state lives under one data directory, resolved from the environment:
//! `TASSE_DATA_DIR` > `$XDG_STATE_HOME/tasse` > `~/.local/state/tasse`.

use crate::lifecycle::LifecycleError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default HTTP bind address.
const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Default interval of the periodic rescan job.
const DEFAULT_SCAN_SECS: u64 = 60;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Task definitions root.
    pub tasks_dir: PathBuf,
    /// Per-task log files root.
    pub logs_dir: PathBuf,
    /// Isolated interpreter environments root.
    pub venvs_dir: PathBuf,
    /// Durable job-store file.
    pub store_path: PathBuf,
    /// Service diagnostic log.
    pub log_path: PathBuf,
    /// Lock/PID file guaranteeing a single instance per data directory.
    pub lock_path: PathBuf,
    /// HTTP bind address for the control API.
    pub bind_addr: SocketAddr,
    /// Interval of the periodic rescan job.
    pub scan_interval: Duration,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let mut config = Self::at(data_dir()?);
        config.bind_addr = bind_addr()?;
        config.scan_interval = scan_interval();
        Ok(config)
    }

    /// Configuration rooted at an explicit data directory, with defaults
    /// for everything else.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            tasks_dir: data_dir.join("tasks"),
            logs_dir: data_dir.join("logs"),
            venvs_dir: data_dir.join("venvs"),
            store_path: data_dir.join("jobs.json"),
            log_path: data_dir.join("tassed.log"),
            lock_path: data_dir.join("tassed.pid"),
            bind_addr: default_bind(),
            scan_interval: Duration::from_secs(DEFAULT_SCAN_SECS),
            data_dir,
        }
    }
}

fn default_bind() -> SocketAddr {
    // The literal is well-formed; fall back to an unspecified port rather
    // than panic if it ever is not.
    DEFAULT_BIND
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 5000)))
}

/// Resolve data directory: TASSE_DATA_DIR > XDG_STATE_HOME/tasse > ~/.local/state/tasse
fn data_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("TASSE_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("tasse"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoDataDir)?;
    Ok(PathBuf::from(home).join(".local/state/tasse"))
}

fn bind_addr() -> Result<SocketAddr, LifecycleError> {
    match std::env::var("TASSE_BIND") {
        Ok(value) => value
            .parse()
            .map_err(|e: std::net::AddrParseError| LifecycleError::BadBindAddr {
                value,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default_bind()),
    }
}

/// Rescan interval override, mainly for tests and local runs.
fn scan_interval() -> Duration {
    std::env::var("TASSE_SCAN_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(DEFAULT_SCAN_SECS))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
