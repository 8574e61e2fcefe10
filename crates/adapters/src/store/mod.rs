// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Automation record store
//!
//! A document store keyed by job id. Each job only ever writes its own
//! record, so no cross-record transactions are needed; the store only has to
//! be read-after-write consistent for a single document.

mod file;
mod memory;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use ob_core::{AutomationRecord, JobId, NewRecord, PatchRejected, RecordPatch};
use thiserror::Error;

/// Errors from record store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    AlreadyExists(JobId),
    #[error("record not found: {0}")]
    NotFound(JobId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid record key: {0:?}")]
    InvalidKey(String),
    #[error("corrupt record {key}: {message}")]
    Corrupt { key: String, message: String },
    #[error("update to {job_id} rejected: {reason}")]
    Rejected { job_id: JobId, reason: PatchRejected },
}

impl StoreError {
    /// Transient failures worth retrying on reads.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Durable job record storage
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Create the record for `job_id`. Fails with `AlreadyExists` if present.
    async fn create(&self, job_id: &JobId, record: NewRecord) -> Result<(), StoreError>;

    /// Merge `patch` into an existing record. Fails with `NotFound` if absent.
    ///
    /// The record's own guard runs under the same lock as the write, so a
    /// terminal record or a supplied OTP can never be overwritten by a writer
    /// that checked an older copy. Refusals surface as `Rejected`.
    async fn update(&self, job_id: &JobId, patch: RecordPatch) -> Result<(), StoreError>;

    /// Point read. A missing record is `Ok(None)`, never an error.
    async fn get(&self, job_id: &JobId) -> Result<Option<AutomationRecord>, StoreError>;

    /// All records, oldest first.
    async fn list(&self) -> Result<Vec<AutomationRecord>, StoreError>;
}
