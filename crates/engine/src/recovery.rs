// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart recovery.
//!
//! After a crash the store may hold jobs that never reached a terminal
//! status. A job parked at `awaiting_otp` with a known browser session is
//! resumed; anything else is marked failed, because replaying a script
//! against the third-party UI is not safe.
//!
//! Only stale records are reclaimed. A record written within the last OTP
//! timeout may still belong to a live process sharing the store, so it is
//! left alone. A live owner can outlast that window only while a single
//! engine run is in flight; if its record is reclaimed meanwhile, the store
//! refuses the owner's next write and the record stays as recovery left it.

use crate::error::OnboardingError;
use crate::orchestrator::{OnboardingReport, Orchestrator};
use ob_adapters::{BrowserEngine, RecordStore, StoreError};
use ob_core::{Clock, JobId, JobState, RecordPatch, RecordStatus};
use tokio::task::JoinHandle;

/// Error recorded on jobs that cannot be resumed after a restart
pub const INTERRUPTED_ERROR: &str = "interrupted before completion";

/// A job resumed by [`recover`], running as its own task
pub struct ResumedJob {
    pub job_id: JobId,
    pub handle: JoinHandle<Result<OnboardingReport, OnboardingError>>,
}

/// What [`recover`] did with each non-terminal record
#[derive(Default)]
pub struct Recovery {
    pub resumed: Vec<ResumedJob>,
    pub interrupted: Vec<JobId>,
    /// Updated too recently to reclaim
    pub active: Vec<JobId>,
    /// Terminal records left untouched
    pub finished: usize,
}

impl Recovery {
    pub fn resumed_ids(&self) -> Vec<JobId> {
        self.resumed.iter().map(|job| job.job_id.clone()).collect()
    }

    /// Wait for every resumed job to reach its terminal state.
    pub async fn join(self) -> Vec<(JobId, Result<OnboardingReport, OnboardingError>)> {
        let mut results = Vec::with_capacity(self.resumed.len());
        for ResumedJob { job_id, handle } in self.resumed {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(OnboardingError::Aborted { job_id: job_id.clone(), message: e.to_string() }),
            };
            results.push((job_id, result));
        }
        results
    }
}

fn resumable(status: RecordStatus, phase: ob_core::Phase, session: Option<&str>) -> bool {
    JobState::from_record(status, phase) == JobState::AwaitingOtp && session.is_some()
}

/// Resume or fail every stale non-terminal job in the store.
pub async fn recover<E, S, C>(orchestrator: &Orchestrator<E, S, C>) -> Result<Recovery, StoreError>
where
    E: BrowserEngine,
    S: RecordStore,
    C: Clock,
{
    let records = orchestrator.store().list().await?;
    let now_ms = orchestrator.clock().epoch_ms();
    let stale_after_ms = orchestrator.otp_wait_config().timeout.as_millis() as u64;
    let mut recovery = Recovery::default();

    for record in records {
        if record.is_terminal() {
            recovery.finished += 1;
            continue;
        }
        let job_id = record.job_id.clone();

        let idle_ms = now_ms.saturating_sub(record.updated_at_ms);
        if idle_ms < stale_after_ms {
            tracing::info!(%job_id, idle_ms, "skipping recently updated job");
            recovery.active.push(job_id);
            continue;
        }

        if resumable(record.status, record.phase, record.browser_session_id.as_deref()) {
            tracing::info!(%job_id, "resuming job after restart");
            let this = orchestrator.clone();
            let id = job_id.clone();
            let handle = tokio::spawn(async move { this.resume(&id).await });
            recovery.resumed.push(ResumedJob { job_id, handle });
            continue;
        }

        let patch = RecordPatch::new().status(RecordStatus::Failed).error(INTERRUPTED_ERROR);
        match orchestrator.store().update(&job_id, patch).await {
            Ok(()) => {
                tracing::warn!(%job_id, status = %record.status, phase = %record.phase, "marked interrupted job failed");
                recovery.interrupted.push(job_id);
            }
            Err(e) => tracing::warn!(%job_id, error = %e, "could not mark interrupted job"),
        }
    }

    tracing::info!(
        resumed = recovery.resumed.len(),
        interrupted = recovery.interrupted.len(),
        active = recovery.active.len(),
        finished = recovery.finished,
        "recovery complete"
    );
    Ok(recovery)
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
