// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ob run` specs

use crate::prelude::*;

const RUN: [&str; 7] = ["run", "--agent", "agent1", "--email", "owner@example.com", "--phone", "+551199999999"];

#[test]
fn requires_a_login_secret() {
    let state = StateDir::new();

    cli().state(&state).unreachable_engine().args(&RUN).fails_with(1).stderr_has("no login secret");
    assert!(state.records().is_empty());
}

#[test]
fn requires_an_engine_api_key() {
    let state = StateDir::new();

    cli()
        .state(&state)
        .env("OB_LOGIN_SECRET", "hunter2")
        .args(&RUN)
        .fails_with(1)
        .stderr_has("BROWSER_USE_API_KEY");
    assert!(state.records().is_empty());
}

#[test]
fn unreachable_engine_fails_the_job_in_login() {
    let state = StateDir::new();

    let out = cli()
        .state(&state)
        .unreachable_engine()
        .args(&RUN)
        .args(&["--secret", "hunter2"])
        .fails_with(1)
        .stdout_has("Started job wa_agent1_")
        .stderr_has("engine failure");
    assert!(!out.stderr.contains("hunter2"));

    let records = state.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.status, RecordStatus::Failed);
    assert_eq!(record.phase, Phase::Login);
    assert_eq!(record.agent_id, "agent1");
    assert_eq!(record.channel_target, TARGET);
    assert!(record.error.is_some());
}
