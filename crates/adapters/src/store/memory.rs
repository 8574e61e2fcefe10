// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use ob_core::{AutomationRecord, Clock, JobId, NewRecord, RecordPatch, SystemClock};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-local record store
#[derive(Clone)]
pub struct MemoryStore<C: Clock = SystemClock> {
    records: Arc<Mutex<HashMap<JobId, AutomationRecord>>>,
    clock: C,
}

impl MemoryStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { records: Arc::new(Mutex::new(HashMap::new())), clock }
    }

    /// Insert or replace a record as-is (seeding state for recovery and tests).
    pub fn insert(&self, record: AutomationRecord) {
        self.records.lock().insert(record.job_id.clone(), record);
    }

    /// Current record without going through the async trait
    pub fn peek(&self, job_id: &str) -> Option<AutomationRecord> {
        self.records.lock().get(job_id).cloned()
    }
}

#[async_trait]
impl<C: Clock> RecordStore for MemoryStore<C> {
    async fn create(&self, job_id: &JobId, record: NewRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        if records.contains_key(job_id) {
            return Err(StoreError::AlreadyExists(job_id.clone()));
        }
        let record = AutomationRecord::from_new(job_id.clone(), record, self.clock.epoch_ms());
        records.insert(job_id.clone(), record);
        Ok(())
    }

    async fn update(&self, job_id: &JobId, patch: RecordPatch) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        let record =
            records.get_mut(job_id).ok_or_else(|| StoreError::NotFound(job_id.clone()))?;
        record
            .apply(&patch, self.clock.epoch_ms())
            .map_err(|reason| StoreError::Rejected { job_id: job_id.clone(), reason })
    }

    async fn get(&self, job_id: &JobId) -> Result<Option<AutomationRecord>, StoreError> {
        Ok(self.records.lock().get(job_id).cloned())
    }

    async fn list(&self) -> Result<Vec<AutomationRecord>, StoreError> {
        let mut records: Vec<_> = self.records.lock().values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.job_id.0.cmp(&b.job_id.0))
        });
        Ok(records)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
