// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Out-of-band OTP write.

use ob_adapters::{RecordStore, StoreError};
use ob_core::{JobId, PatchRejected, RecordPatch, RecordStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitOtpError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job {job_id} already finished ({status})")]
    JobFinished { job_id: JobId, status: RecordStatus },
    #[error("verification code is empty")]
    EmptyCode,
    #[error("a code was already submitted for job {0}")]
    AlreadySubmitted(JobId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Write the OTP for a live job.
///
/// The code is stored verbatim with a single update. A record holds at most
/// one code: a second submission is rejected rather than overwriting it.
/// The read only gives early answers; the store re-checks both conditions
/// under its write lock, so a job that finishes in between is still refused.
pub async fn submit_otp<S: RecordStore>(
    store: &S,
    job_id: &JobId,
    code: &str,
) -> Result<(), SubmitOtpError> {
    if code.trim().is_empty() {
        return Err(SubmitOtpError::EmptyCode);
    }
    let record = store.get(job_id).await?.ok_or_else(|| SubmitOtpError::NotFound(job_id.clone()))?;
    if record.is_terminal() {
        return Err(SubmitOtpError::JobFinished { job_id: job_id.clone(), status: record.status });
    }
    if record.supplied_otp().is_some() {
        return Err(SubmitOtpError::AlreadySubmitted(job_id.clone()));
    }

    store.update(job_id, RecordPatch::new().otp_code(code)).await.map_err(|e| match e {
        StoreError::Rejected { reason: PatchRejected::Terminal(status), .. } => {
            SubmitOtpError::JobFinished { job_id: job_id.clone(), status }
        }
        StoreError::Rejected { reason: PatchRejected::OtpAlreadySupplied, .. } => {
            SubmitOtpError::AlreadySubmitted(job_id.clone())
        }
        StoreError::NotFound(_) => SubmitOtpError::NotFound(job_id.clone()),
        other => SubmitOtpError::Store(other),
    })?;
    tracing::info!(%job_id, phase = %record.phase, "otp submitted");
    Ok(())
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
