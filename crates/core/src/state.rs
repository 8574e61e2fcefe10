// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Onboarding job state machine.
//!
//! ```text
//! created ─▶ login_in_progress ─▶ awaiting_otp ─▶ resuming ─▶ completed
//!                   │                 │   │           │
//!                   └──────▶ failed ◀─┘   └▶ timed_out │
//!                              ▲──────────────────────┘
//! ```

use crate::record::{Phase, RecordPatch, RecordStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Orchestrator-side state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Created,
    LoginInProgress,
    AwaitingOtp,
    Resuming,
    Completed,
    Failed,
    TimedOut,
}

/// Something that happened to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobEvent {
    /// Login script built and a session acquired for it
    LoginStarted,
    /// Engine finished the login/navigation script
    LoginSucceeded,
    /// The rendezvous produced a code
    OtpReceived,
    /// The rendezvous deadline elapsed
    OtpTimedOut,
    /// Engine finished the OTP-entry script
    OtpEntered,
    /// Engine or store failure while the job was live
    Failed,
}

crate::simple_display! {
    JobState {
        Created => "created",
        LoginInProgress => "login_in_progress",
        AwaitingOtp => "awaiting_otp",
        Resuming => "resuming",
        Completed => "completed",
        Failed => "failed",
        TimedOut => "timed_out",
    }
}

crate::simple_display! {
    JobEvent {
        LoginStarted => "login_started",
        LoginSucceeded => "login_succeeded",
        OtpReceived => "otp_received",
        OtpTimedOut => "otp_timed_out",
        OtpEntered => "otp_entered",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job is already {0}")]
    Terminal(JobState),
    #[error("no transition from {from} on {event}")]
    Invalid { from: JobState, event: JobEvent },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed | JobState::TimedOut)
    }

    /// Apply an event, returning the next state.
    pub fn on(self, event: JobEvent) -> Result<JobState, TransitionError> {
        use JobEvent as E;
        use JobState as S;

        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        match (self, event) {
            (S::Created, E::LoginStarted) => Ok(S::LoginInProgress),
            (S::LoginInProgress, E::LoginSucceeded) => Ok(S::AwaitingOtp),
            (S::AwaitingOtp, E::OtpReceived) => Ok(S::Resuming),
            (S::AwaitingOtp, E::OtpTimedOut) => Ok(S::TimedOut),
            (S::Resuming, E::OtpEntered) => Ok(S::Completed),
            (S::LoginInProgress | S::AwaitingOtp | S::Resuming, E::Failed) => Ok(S::Failed),
            (from, event) => Err(TransitionError::Invalid { from, event }),
        }
    }

    /// Persisted status for this state.
    pub fn record_status(&self) -> RecordStatus {
        match self {
            JobState::Created | JobState::LoginInProgress => RecordStatus::Running,
            JobState::AwaitingOtp | JobState::Resuming => RecordStatus::Waiting,
            JobState::Completed => RecordStatus::Success,
            JobState::Failed => RecordStatus::Failed,
            JobState::TimedOut => RecordStatus::TimedOut,
        }
    }

    /// Phase label for this state. Failure states keep whatever phase was last written.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            JobState::Created | JobState::LoginInProgress => Some(Phase::Login),
            JobState::AwaitingOtp => Some(Phase::AwaitingOtp),
            JobState::Resuming => Some(Phase::SubmittingOtp),
            JobState::Completed => Some(Phase::Completed),
            JobState::Failed | JobState::TimedOut => None,
        }
    }

    /// The record update issued when a job enters this state.
    pub fn entry_patch(&self) -> RecordPatch {
        let mut patch = RecordPatch::new().status(self.record_status());
        patch.phase = self.phase();
        patch
    }

    /// Reconstruct the live state from a persisted status/phase pair.
    pub fn from_record(status: RecordStatus, phase: Phase) -> JobState {
        match (status, phase) {
            (RecordStatus::Success, _) => JobState::Completed,
            (RecordStatus::Failed, _) => JobState::Failed,
            (RecordStatus::TimedOut, _) => JobState::TimedOut,
            (_, Phase::SubmittingOtp) => JobState::Resuming,
            (RecordStatus::Waiting, _) => JobState::AwaitingOtp,
            (RecordStatus::Running, _) => JobState::LoginInProgress,
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
