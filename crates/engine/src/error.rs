// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ob_adapters::{EngineError, StoreError};
use ob_core::{JobId, TransitionError};
use std::time::Duration;
use thiserror::Error;

/// Terminal failure of an onboarding job
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("job {0} already exists")]
    AlreadyExists(JobId),

    #[error("job {job_id}: engine failure: {source}")]
    Engine { job_id: JobId, source: EngineError },

    #[error("job {job_id}: timed out waiting for OTP after {}s", .waited.as_secs())]
    OtpTimeout { job_id: JobId, waited: Duration },

    #[error("job {job_id}: store error: {source}")]
    Store { job_id: JobId, source: StoreError },

    #[error("job {job_id}: {source}")]
    Transition { job_id: JobId, source: TransitionError },

    #[error("job {job_id} cannot be resumed: {reason}")]
    NotResumable { job_id: JobId, reason: String },

    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("job {job_id}: task aborted: {message}")]
    Aborted { job_id: JobId, message: String },
}

impl OnboardingError {
    pub fn job_id(&self) -> &JobId {
        match self {
            OnboardingError::AlreadyExists(job_id) | OnboardingError::NotFound(job_id) => job_id,
            OnboardingError::Engine { job_id, .. }
            | OnboardingError::OtpTimeout { job_id, .. }
            | OnboardingError::Store { job_id, .. }
            | OnboardingError::Transition { job_id, .. }
            | OnboardingError::NotResumable { job_id, .. }
            | OnboardingError::Aborted { job_id, .. } => job_id,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, OnboardingError::OtpTimeout { .. })
    }
}
