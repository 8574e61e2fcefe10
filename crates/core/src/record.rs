// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted automation job record and its partial updates.

use crate::id::JobId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error message recorded when the OTP never arrives.
pub const OTP_TIMEOUT_ERROR: &str = "Timed out waiting for OTP";

/// Persisted job status.
///
/// Advances `running → waiting → {success | failed | timed_out}`; the last
/// three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Running,
    Waiting,
    Success,
    Failed,
    TimedOut,
}

impl RecordStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordStatus::Success | RecordStatus::Failed | RecordStatus::TimedOut)
    }

    /// Position along the status order. A write may never lower it.
    pub fn rank(&self) -> u8 {
        match self {
            RecordStatus::Running => 0,
            RecordStatus::Waiting => 1,
            RecordStatus::Success | RecordStatus::Failed | RecordStatus::TimedOut => 2,
        }
    }
}

crate::simple_display! {
    RecordStatus {
        Running => "running",
        Waiting => "waiting",
        Success => "success",
        Failed => "failed",
        TimedOut => "timed_out",
    }
}

/// Human-readable sub-step label. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Login,
    AwaitingOtp,
    SubmittingOtp,
    Completed,
}

crate::simple_display! {
    Phase {
        Login => "login",
        AwaitingOtp => "awaiting_otp",
        SubmittingOtp => "submitting_otp",
        Completed => "completed",
    }
}

/// One onboarding attempt as stored in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRecord {
    pub job_id: JobId,
    pub status: RecordStatus,
    pub agent_id: String,
    /// Destination being onboarded (e.g. a phone number)
    pub channel_target: String,
    pub phase: Phase,
    /// Written once by an out-of-band actor; absent until supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_code: Option<String>,
    /// Set only on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Engine-side session id acquired during login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_session_id: Option<String>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl AutomationRecord {
    /// Materialize a freshly created record.
    pub fn from_new(job_id: JobId, new: NewRecord, epoch_ms: u64) -> Self {
        Self {
            job_id,
            status: new.status,
            agent_id: new.agent_id,
            channel_target: new.channel_target,
            phase: new.phase,
            otp_code: None,
            error: None,
            browser_session_id: None,
            created_at_ms: epoch_ms,
            updated_at_ms: epoch_ms,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The supplied OTP, if any. Blank values count as not yet supplied.
    pub fn supplied_otp(&self) -> Option<&str> {
        self.otp_code.as_deref().filter(|code| !code.trim().is_empty())
    }

    /// Whether `patch` may be merged into this record.
    ///
    /// Terminal records are frozen, status never moves back along its order
    /// and a supplied OTP is never replaced.
    pub fn check(&self, patch: &RecordPatch) -> Result<(), PatchRejected> {
        if self.is_terminal() {
            return Err(PatchRejected::Terminal(self.status));
        }
        if let Some(status) = patch.status {
            if status.rank() < self.status.rank() {
                return Err(PatchRejected::StatusRegression { from: self.status, to: status });
            }
        }
        if patch.otp_code.is_some() && self.supplied_otp().is_some() {
            return Err(PatchRejected::OtpAlreadySupplied);
        }
        Ok(())
    }

    /// Merge a partial update; fields absent from the patch are untouched.
    ///
    /// Nothing changes when [`check`](Self::check) refuses the patch.
    pub fn apply(&mut self, patch: &RecordPatch, epoch_ms: u64) -> Result<(), PatchRejected> {
        self.check(patch)?;
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(phase) = patch.phase {
            self.phase = phase;
        }
        if let Some(ref error) = patch.error {
            self.error = Some(error.clone());
        }
        if let Some(ref code) = patch.otp_code {
            self.otp_code = Some(code.clone());
        }
        if let Some(ref session) = patch.browser_session_id {
            self.browser_session_id = Some(session.clone());
        }
        self.updated_at_ms = epoch_ms;
        Ok(())
    }
}

/// Why a patch was refused by [`AutomationRecord::check`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchRejected {
    #[error("record is already {0}")]
    Terminal(RecordStatus),
    #[error("status cannot move from {from} back to {to}")]
    StatusRegression { from: RecordStatus, to: RecordStatus },
    #[error("an OTP was already supplied")]
    OtpAlreadySupplied,
}

crate::builder! {
    pub struct AutomationRecordBuilder => AutomationRecord {
        into {
            job_id: JobId = "wa_agent1_1000",
            agent_id: String = "agent1",
            channel_target: String = "+551199999999",
        }
        set {
            status: RecordStatus = RecordStatus::Running,
            phase: Phase = Phase::Login,
            created_at_ms: u64 = 1_000_000,
            updated_at_ms: u64 = 1_000_000,
        }
        option {
            otp_code: String = None,
            error: String = None,
            browser_session_id: String = None,
        }
    }
}

/// Initial fields for a record creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub agent_id: String,
    pub channel_target: String,
    pub status: RecordStatus,
    pub phase: Phase,
}

impl NewRecord {
    /// A job that is starting its login phase.
    pub fn starting(agent_id: impl Into<String>, channel_target: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            channel_target: channel_target.into(),
            status: RecordStatus::Running,
            phase: Phase::Login,
        }
    }
}

/// Partial update merged into an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_session_id: Option<String>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    crate::setters! {
        option {
            status: RecordStatus,
            phase: Phase,
            error: String,
            otp_code: String,
            browser_session_id: String,
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
