// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake record store for testing

use super::{MemoryStore, RecordStore, StoreError};
use async_trait::async_trait;
use ob_core::{AutomationRecord, FakeClock, JobId, NewRecord, RecordPatch};
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create { job_id: JobId, record: NewRecord },
    Update { job_id: JobId, patch: RecordPatch },
    Get { job_id: JobId },
    List,
}

#[derive(Default)]
struct FakeStoreState {
    calls: Vec<StoreCall>,
    failing_gets: u32,
    failing_updates: u32,
}

/// In-memory store that records every call and can inject failures
#[derive(Clone)]
pub struct FakeStore {
    records: MemoryStore<FakeClock>,
    clock: FakeClock,
    inner: Arc<Mutex<FakeStoreState>>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::with_clock(FakeClock::new())
    }

    pub fn with_clock(clock: FakeClock) -> Self {
        Self {
            records: MemoryStore::with_clock(clock.clone()),
            clock,
            inner: Arc::new(Mutex::new(FakeStoreState::default())),
        }
    }

    pub fn clock(&self) -> &FakeClock {
        &self.clock
    }

    /// Seed a record without recording a call
    pub fn insert(&self, record: AutomationRecord) {
        self.records.insert(record);
    }

    /// The next `n` reads fail with `Unavailable`
    pub fn fail_gets(&self, n: u32) {
        self.inner.lock().failing_gets = n;
    }

    /// The next `n` updates fail with `Unavailable`
    pub fn fail_updates(&self, n: u32) {
        self.inner.lock().failing_updates = n;
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    /// Patches applied to one job, in order (failed updates included)
    pub fn updates_for(&self, job_id: &str) -> Vec<RecordPatch> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Update { job_id: id, patch } if id == job_id => Some(patch.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of point reads issued for one job
    pub fn get_count(&self, job_id: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, StoreCall::Get { job_id: id } if id == job_id))
            .count()
    }

    /// Current record state without recording a call
    pub fn snapshot(&self, job_id: &str) -> Option<AutomationRecord> {
        self.records.peek(job_id)
    }

    fn record(&self, call: StoreCall) {
        self.inner.lock().calls.push(call);
    }

    fn take_failure(counter: &mut u32) -> bool {
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn create(&self, job_id: &JobId, record: NewRecord) -> Result<(), StoreError> {
        self.record(StoreCall::Create { job_id: job_id.clone(), record: record.clone() });
        self.records.create(job_id, record).await
    }

    async fn update(&self, job_id: &JobId, patch: RecordPatch) -> Result<(), StoreError> {
        self.record(StoreCall::Update { job_id: job_id.clone(), patch: patch.clone() });
        let fail = Self::take_failure(&mut self.inner.lock().failing_updates);
        if fail {
            return Err(StoreError::Unavailable("injected update failure".to_string()));
        }
        self.records.update(job_id, patch).await
    }

    async fn get(&self, job_id: &JobId) -> Result<Option<AutomationRecord>, StoreError> {
        self.record(StoreCall::Get { job_id: job_id.clone() });
        let fail = Self::take_failure(&mut self.inner.lock().failing_gets);
        if fail {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        self.records.get(job_id).await
    }

    async fn list(&self) -> Result<Vec<AutomationRecord>, StoreError> {
        self.record(StoreCall::List);
        self.records.list().await
    }
}
