// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ob otp` specs

use crate::prelude::*;

#[test]
fn writes_the_code_into_the_record() {
    let state = StateDir::new();
    state.seed(waiting_record("wa_agent1_1000"));

    cli()
        .state(&state)
        .args(&["otp", "wa_agent1_1000", "482193"])
        .passes()
        .stdout_has("Code submitted for job wa_agent1_1000");

    let record = state.read("wa_agent1_1000");
    assert_eq!(record.otp_code.as_deref(), Some("482193"));
    assert_eq!(record.status, RecordStatus::Waiting);
}

#[test]
fn second_code_is_rejected() {
    let state = StateDir::new();
    state.seed(waiting_record("wa_agent1_1000"));

    cli().state(&state).args(&["otp", "wa_agent1_1000", "111111"]).passes();
    cli()
        .state(&state)
        .args(&["otp", "wa_agent1_1000", "222222"])
        .fails_with(1)
        .stderr_has("already submitted");

    assert_eq!(state.read("wa_agent1_1000").otp_code.as_deref(), Some("111111"));
}

#[test]
fn finished_job_is_rejected() {
    let state = StateDir::new();
    state.seed(AutomationRecord::builder().status(RecordStatus::Success).phase(Phase::Completed).build());

    cli()
        .state(&state)
        .args(&["otp", "wa_agent1_1000", "482193"])
        .fails_with(1)
        .stderr_has("already finished");
}

#[test]
fn blank_code_is_rejected() {
    let state = StateDir::new();
    state.seed(waiting_record("wa_agent1_1000"));

    cli().state(&state).args(&["otp", "wa_agent1_1000", "  "]).fails_with(1).stderr_has("empty");
}

#[test]
fn unknown_job_is_rejected() {
    let state = StateDir::new();

    cli().state(&state).args(&["otp", "wa_nobody_1", "482193"]).fails_with(1).stderr_has("not found");
}

#[test]
fn path_like_job_id_is_refused() {
    let state = StateDir::new();

    cli()
        .state(&state)
        .args(&["otp", "../escape", "482193"])
        .fails_with(1)
        .stderr_has("invalid record key");
}
