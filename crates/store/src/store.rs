// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-file-backed job store.
//!
//! The whole job set is rewritten atomically (write to `.tmp`, fsync,
//! rename) on every mutation. Updates to a single record are therefore
//! atomic; multi-call sequences (remove then re-add) are not, and callers
//! rely on the next reconciliation pass to self-heal after a crash in
//! between.

use crate::record::JobRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tasse_core::JobId;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur in job-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk representation: a flat list of records.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    jobs: Vec<JobRecord>,
}

/// Durable mapping from job id to job record.
#[derive(Debug)]
pub struct JobStore {
    path: PathBuf,
    jobs: HashMap<JobId, JobRecord>,
}

impl JobStore {
    /// Open the store at `path`, loading existing records if present.
    ///
    /// A corrupt file is moved aside to `.bak` and the store starts empty;
    /// the next reconciliation rebuilds it from the task directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let jobs = match Self::load(&path)? {
            Some(file) => file.jobs.into_iter().map(|j| (j.id.clone(), j)).collect(),
            None => HashMap::new(),
        };
        Ok(Self { path, jobs })
    }

    fn load(path: &Path) -> Result<Option<StoreFile>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                let bak_path = path.with_extension("bak");
                warn!(
                    error = %e,
                    path = %path.display(),
                    bak = %bak_path.display(),
                    "corrupt job store, moving to .bak and starting fresh",
                );
                fs::rename(path, &bak_path)?;
                Ok(None)
            }
        }
    }

    /// Persist atomically (write to .tmp, fsync, rename).
    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &StoreFile { jobs: self.list() })?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn get(&self, id: &JobId) -> Option<&JobRecord> {
        self.jobs.get(id)
    }

    /// All records, ordered by id for deterministic iteration.
    pub fn list(&self) -> Vec<JobRecord> {
        let mut jobs: Vec<JobRecord> = self.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Insert or replace a record and persist.
    pub fn insert(&mut self, record: JobRecord) -> Result<(), StoreError> {
        self.jobs.insert(record.id.clone(), record);
        self.save()
    }

    /// Remove a record and persist. Removing an absent id is a no-op and
    /// does not touch the file.
    pub fn remove(&mut self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        match self.jobs.remove(id) {
            Some(record) => {
                self.save()?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Update a record's next fire time and persist. Returns false if the
    /// id is unknown (nothing is written).
    pub fn update_next_fire(
        &mut self,
        id: &JobId,
        next_fire_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError> {
        match self.jobs.get_mut(id) {
            Some(record) => {
                record.next_fire_at = next_fire_at;
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
