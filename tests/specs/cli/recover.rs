// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ob recover` specs

use crate::prelude::*;

#[test]
fn marks_interrupted_jobs_failed_and_leaves_finished_ones() {
    let state = StateDir::new();
    state.seed(AutomationRecord::builder().job_id("wa_b_1").build());
    state.seed(
        AutomationRecord::builder()
            .job_id("wa_d_1")
            .status(RecordStatus::Success)
            .phase(Phase::Completed)
            .build(),
    );

    cli()
        .state(&state)
        .unreachable_engine()
        .args(&["recover"])
        .passes()
        .stdout_has("Marked wa_b_1 failed (interrupted)")
        .stdout_has("Nothing to resume (1 interrupted, 1 finished)");

    let interrupted = state.read("wa_b_1");
    assert_eq!(interrupted.status, RecordStatus::Failed);
    assert_eq!(interrupted.error.as_deref(), Some(ob_engine::INTERRUPTED_ERROR));
    assert_eq!(state.read("wa_d_1").status, RecordStatus::Success);
}

#[test]
fn parked_job_whose_session_is_gone_fails() {
    let state = StateDir::new();
    state.seed(waiting_record("wa_a_1"));

    cli()
        .state(&state)
        .unreachable_engine()
        .args(&["recover"])
        .fails_with(1)
        .stdout_has("Resumed wa_a_1")
        .stderr_has("1 resumed job(s) did not complete");

    assert_eq!(state.read("wa_a_1").status, RecordStatus::Failed);
}

#[test]
fn recently_updated_job_is_not_reclaimed() {
    let state = StateDir::new();
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    state.seed(
        AutomationRecord::builder()
            .job_id("wa_live_1")
            .created_at_ms(now_ms)
            .updated_at_ms(now_ms)
            .build(),
    );

    cli()
        .state(&state)
        .unreachable_engine()
        .args(&["recover"])
        .passes()
        .stdout_has("Skipped wa_live_1 (updated recently, may still be running)")
        .stdout_lacks("Marked wa_live_1");

    let record = state.read("wa_live_1");
    assert_eq!(record.status, RecordStatus::Running);
    assert_eq!(record.error, None);
}
