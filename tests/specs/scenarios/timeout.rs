// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario B: the OTP never arrives.

use crate::prelude::*;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn job_times_out_after_the_deadline() {
    let h = Harness::new();

    let start = Instant::now();
    let err = h.orchestrator.run_onboarding(Harness::request("agent1")).await.unwrap_err();

    assert!(err.is_timeout(), "{err}");
    assert!(start.elapsed() >= Duration::from_secs(180));

    let record = h.record("wa_agent1_1000");
    assert_eq!(record.status, RecordStatus::TimedOut);
    assert_eq!(record.error.as_deref(), Some(OTP_TIMEOUT_ERROR));
    assert_eq!(record.otp_code, None);
    h.assert_monotone("wa_agent1_1000");
}

#[tokio::test(start_paused = true)]
async fn resuming_is_never_entered() {
    let h = Harness::new();

    h.orchestrator.run_onboarding(Harness::request("agent1")).await.unwrap_err();

    assert!(h
        .transitions("wa_agent1_1000")
        .iter()
        .all(|patch| patch.phase != Some(Phase::SubmittingOtp)));
    assert_eq!(h.engine.runs().len(), 1);
    assert_eq!(h.engine.released().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn late_code_is_rejected_once_timed_out() {
    let h = Harness::new();

    h.orchestrator.run_onboarding(Harness::request("agent1")).await.unwrap_err();
    let late = submit_otp(&h.store, &JobId::new("wa_agent1_1000"), "482193").await;

    assert!(late.is_err());
    assert_eq!(h.record("wa_agent1_1000").otp_code, None);
}
