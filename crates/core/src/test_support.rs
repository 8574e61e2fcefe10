// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::credentials::Credentials;

/// Proptest strategies for the job state machine.
pub mod strategies {
    use crate::state::{JobEvent, JobState};
    use proptest::prelude::*;

    pub fn arb_job_state() -> impl Strategy<Value = JobState> {
        prop_oneof![
            Just(JobState::Created),
            Just(JobState::LoginInProgress),
            Just(JobState::AwaitingOtp),
            Just(JobState::Resuming),
            Just(JobState::Completed),
            Just(JobState::Failed),
            Just(JobState::TimedOut),
        ]
    }

    pub fn arb_job_event() -> impl Strategy<Value = JobEvent> {
        prop_oneof![
            Just(JobEvent::LoginStarted),
            Just(JobEvent::LoginSucceeded),
            Just(JobEvent::OtpReceived),
            Just(JobEvent::OtpTimedOut),
            Just(JobEvent::OtpEntered),
            Just(JobEvent::Failed),
        ]
    }

    /// Six-digit numeric codes, the shape SMS verification codes take.
    pub fn arb_otp_code() -> impl Strategy<Value = String> {
        "[0-9]{6}"
    }
}

/// Credentials used throughout the test suites.
pub fn test_credentials() -> Credentials {
    Credentials::new("owner@example.com", "hunter2")
}
