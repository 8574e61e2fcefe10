// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed record store: one JSON document per job.
//!
//! ```text
//! <dir>/
//!   .lock                    advisory lock held across read-modify-write
//!   wa_agent1_1000.json
//!   wa_agent2_1004.json
//! ```
//!
//! Writes go to a temp file and are renamed into place. The advisory lock
//! serializes writers across processes, so an out-of-band OTP write from a
//! second process cannot be lost under a concurrent status update.

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use fs2::FileExt;
use ob_core::{AutomationRecord, Clock, JobId, NewRecord, RecordPatch, SystemClock};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Record store persisted under a state directory
#[derive(Clone)]
pub struct FileStore<C: Clock = SystemClock> {
    dir: PathBuf,
    clock: C,
}

impl FileStore<SystemClock> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, SystemClock)
    }
}

impl<C: Clock> FileStore<C> {
    pub fn with_clock(dir: impl Into<PathBuf>, clock: C) -> Self {
        Self { dir: dir.into(), clock }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run a blocking filesystem operation off the async runtime.
    async fn blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path, u64) -> Result<T, StoreError> + Send + 'static,
    {
        let dir = self.dir.clone();
        let now = self.clock.epoch_ms();
        tokio::task::spawn_blocking(move || op(&dir, now))
            .await
            .map_err(|e| StoreError::Unavailable(format!("store task failed: {}", e)))?
    }
}

fn unavailable(e: std::io::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Keys become file names, so anything that could escape the directory is refused.
fn record_path(dir: &Path, key: &str) -> Result<PathBuf, StoreError> {
    let safe = !key.is_empty()
        && !key.starts_with('.')
        && !key.contains("..")
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'));
    if !safe {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(dir.join(format!("{}.json", key)))
}

/// Exclusive advisory lock on `<dir>/.lock`; released when the file drops.
fn lock_dir(dir: &Path) -> Result<File, StoreError> {
    fs::create_dir_all(dir).map_err(unavailable)?;
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.join(".lock"))
        .map_err(unavailable)?;
    file.lock_exclusive().map_err(unavailable)?;
    Ok(file)
}

fn read_record(path: &Path) -> Result<Option<AutomationRecord>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(unavailable(e)),
    };
    serde_json::from_slice(&bytes).map(Some).map_err(|e| StoreError::Corrupt {
        key: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_record(path: &Path, record: &AutomationRecord) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(record).map_err(|e| StoreError::Corrupt {
        key: record.job_id.to_string(),
        message: e.to_string(),
    })?;
    let tmp = path.with_extension("json.tmp");
    let mut file = File::create(&tmp).map_err(unavailable)?;
    file.write_all(&json).map_err(unavailable)?;
    file.sync_all().map_err(unavailable)?;
    fs::rename(&tmp, path).map_err(unavailable)
}

#[async_trait]
impl<C: Clock> RecordStore for FileStore<C> {
    async fn create(&self, job_id: &JobId, record: NewRecord) -> Result<(), StoreError> {
        let job_id = job_id.clone();
        self.blocking(move |dir, now| {
            let path = record_path(dir, &job_id)?;
            let _lock = lock_dir(dir)?;
            if path.exists() {
                return Err(StoreError::AlreadyExists(job_id));
            }
            write_record(&path, &AutomationRecord::from_new(job_id.clone(), record, now))
        })
        .await
    }

    async fn update(&self, job_id: &JobId, patch: RecordPatch) -> Result<(), StoreError> {
        let job_id = job_id.clone();
        self.blocking(move |dir, now| {
            let path = record_path(dir, &job_id)?;
            let _lock = lock_dir(dir)?;
            let mut record = read_record(&path)?.ok_or_else(|| StoreError::NotFound(job_id.clone()))?;
            record.apply(&patch, now).map_err(|reason| StoreError::Rejected { job_id, reason })?;
            write_record(&path, &record)
        })
        .await
    }

    async fn get(&self, job_id: &JobId) -> Result<Option<AutomationRecord>, StoreError> {
        let job_id = job_id.clone();
        self.blocking(move |dir, _| read_record(&record_path(dir, &job_id)?)).await
    }

    async fn list(&self) -> Result<Vec<AutomationRecord>, StoreError> {
        self.blocking(|dir, _| {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(unavailable(e)),
            };
            let mut records = Vec::new();
            for entry in entries {
                let path = entry.map_err(unavailable)?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Some(record) = read_record(&path)? {
                    records.push(record);
                }
            }
            records.sort_by(|a: &AutomationRecord, b: &AutomationRecord| {
                a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.job_id.0.cmp(&b.job_id.0))
            });
            Ok(records)
        })
        .await
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
