// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario A: login succeeds, the OTP arrives, the job completes.

use crate::prelude::*;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn otp_after_ten_units_completes_the_job() {
    let h = Harness::new();
    h.engine.push_ok(AWAITING_CODE_MARKER);
    h.engine.push_ok("Number verified");

    let start = Instant::now();
    let (job_id, handle) = h.orchestrator.spawn(Harness::request("agent1")).await.unwrap();
    assert_eq!(job_id, "wa_agent1_1000");
    h.deliver_otp_after(&job_id, "482193", Duration::from_secs(10));

    let report = handle.await.unwrap().unwrap();
    let elapsed = start.elapsed();

    assert!(report.history.contains(&JobState::Resuming));
    assert_eq!(report.history.last(), Some(&JobState::Completed));
    assert_valid_history(&report.history);
    assert!(elapsed >= Duration::from_secs(10) && elapsed <= Duration::from_secs(15), "{:?}", elapsed);

    let record = h.record(&job_id);
    assert_eq!(record.status, RecordStatus::Success);
    assert_eq!(record.phase, Phase::Completed);
    assert_eq!(record.channel_target, TARGET);
    assert_eq!(record.otp_code.as_deref(), Some("482193"));
    assert_eq!(record.error, None);
    h.assert_monotone(&job_id);
}

#[tokio::test(start_paused = true)]
async fn otp_entry_runs_on_the_login_handle_with_the_exact_code() {
    let h = Harness::new();

    let (job_id, handle) = h.orchestrator.spawn(Harness::request("agent1")).await.unwrap();
    h.deliver_otp_after(&job_id, "482193", Duration::from_secs(10));
    handle.await.unwrap().unwrap();

    let runs = h.engine.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].handle, runs[1].handle);
    assert!(runs[1].script.contains("482193"));
    assert_eq!(h.engine.released(), vec![runs[0].handle]);
}

#[tokio::test(start_paused = true)]
async fn no_writes_after_success() {
    let h = Harness::new();

    let (job_id, handle) = h.orchestrator.spawn(Harness::request("agent1")).await.unwrap();
    h.deliver_otp_after(&job_id, "482193", Duration::from_secs(10));
    handle.await.unwrap().unwrap();
    let writes = h.store.updates_for(&job_id).len();

    tokio::time::sleep(Duration::from_secs(300)).await;

    assert_eq!(h.store.updates_for(&job_id).len(), writes);
    let last = h.store.updates_for(&job_id).pop().unwrap();
    assert_eq!(last.status, Some(RecordStatus::Success));
}
