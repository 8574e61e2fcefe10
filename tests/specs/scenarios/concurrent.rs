// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario D: two jobs run side by side with different OTP arrival times.

use crate::prelude::*;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn jobs_complete_independently() {
    let h = Harness::new();

    let start = Instant::now();
    let (job_a, handle_a) = h.orchestrator.spawn(Harness::request("agent1")).await.unwrap();
    let (job_b, handle_b) = h.orchestrator.spawn(Harness::request("agent2")).await.unwrap();
    assert_ne!(job_a, job_b);
    h.deliver_otp_after(&job_a, "111111", Duration::from_secs(5));
    h.deliver_otp_after(&job_b, "222222", Duration::from_secs(50));

    let report_a = handle_a.await.unwrap().unwrap();
    let done_a = start.elapsed();
    let report_b = handle_b.await.unwrap().unwrap();
    let done_b = start.elapsed();

    assert!(done_a < Duration::from_secs(50), "{:?}", done_a);
    assert!(done_b >= Duration::from_secs(50), "{:?}", done_b);
    assert_valid_history(&report_a.history);
    assert_valid_history(&report_b.history);

    for (job_id, code) in [(&job_a, "111111"), (&job_b, "222222")] {
        let record = h.record(job_id);
        assert_eq!(record.status, RecordStatus::Success);
        assert_eq!(record.otp_code.as_deref(), Some(code));
        h.assert_monotone(job_id);
    }
}

#[tokio::test(start_paused = true)]
async fn each_job_keeps_its_own_session_handle() {
    let h = Harness::new();

    let (job_a, handle_a) = h.orchestrator.spawn(Harness::request("agent1")).await.unwrap();
    let (job_b, handle_b) = h.orchestrator.spawn(Harness::request("agent2")).await.unwrap();
    h.deliver_otp_after(&job_a, "111111", Duration::from_secs(5));
    h.deliver_otp_after(&job_b, "222222", Duration::from_secs(50));
    handle_a.await.unwrap().unwrap();
    handle_b.await.unwrap().unwrap();

    let session_a = h.record(&job_a).browser_session_id.unwrap();
    let session_b = h.record(&job_b).browser_session_id.unwrap();
    assert_ne!(session_a, session_b);

    let runs_a = h.engine.runs_in(&session_a);
    let runs_b = h.engine.runs_in(&session_b);
    assert_eq!(runs_a.len(), 2);
    assert_eq!(runs_b.len(), 2);
    assert_eq!(runs_a[0].handle, runs_a[1].handle);
    assert_eq!(runs_b[0].handle, runs_b[1].handle);
    assert_ne!(runs_a[0].handle, runs_b[0].handle);
    assert!(runs_a[1].script.contains("111111"));
    assert!(runs_b[1].script.contains("222222"));
    assert_eq!(h.engine.released().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn one_failure_does_not_touch_the_other_job() {
    let h = Harness::new();
    // Login runs for both jobs consume the queue in spawn order
    h.engine.push_err("login blocked");

    let (job_a, handle_a) = h.orchestrator.spawn(Harness::request("agent1")).await.unwrap();
    let (job_b, handle_b) = h.orchestrator.spawn(Harness::request("agent2")).await.unwrap();
    h.deliver_otp_after(&job_b, "222222", Duration::from_secs(5));

    assert!(handle_a.await.unwrap().is_err());
    handle_b.await.unwrap().unwrap();

    assert_eq!(h.record(&job_a).status, RecordStatus::Failed);
    assert_eq!(h.record(&job_b).status, RecordStatus::Success);
}
