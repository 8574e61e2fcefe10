// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario C: the login phase raises an engine error.

use crate::prelude::*;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn engine_error_fails_the_job_immediately() {
    let h = Harness::new();
    h.engine.push_err("invalid password");

    let start = Instant::now();
    let err = h.orchestrator.run_onboarding(Harness::request("agent1")).await.unwrap_err();

    assert!(matches!(err, OnboardingError::Engine { .. }), "{err}");
    assert_eq!(start.elapsed(), Duration::ZERO);

    let record = h.record("wa_agent1_1000");
    assert_eq!(record.status, RecordStatus::Failed);
    assert!(record.error.unwrap().contains("invalid password"));
    h.assert_monotone("wa_agent1_1000");
}

#[tokio::test(start_paused = true)]
async fn awaiting_otp_is_never_reached_and_nothing_polls() {
    let h = Harness::new();
    h.engine.push_err("invalid password");

    h.orchestrator.run_onboarding(Harness::request("agent1")).await.unwrap_err();

    assert!(h
        .transitions("wa_agent1_1000")
        .iter()
        .all(|patch| patch.phase != Some(Phase::AwaitingOtp) && patch.status != Some(RecordStatus::Waiting)));
    assert_eq!(h.store.get_count("wa_agent1_1000"), 0);
    assert_eq!(h.engine.runs().len(), 1);
}
