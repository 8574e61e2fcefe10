// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ob status` specs

use crate::prelude::*;

#[test]
fn shows_a_waiting_job() {
    let state = StateDir::new();
    state.seed(waiting_record("wa_agent1_1000"));

    cli()
        .state(&state)
        .args(&["status", "wa_agent1_1000"])
        .passes()
        .stdout_has("wa_agent1_1000")
        .stdout_has("Status:  waiting")
        .stdout_has("Phase:   awaiting_otp")
        .stdout_has("OTP:     -");
}

#[test]
fn json_output_is_the_record() {
    let state = StateDir::new();
    state.seed(AutomationRecord::builder().status(RecordStatus::TimedOut).error(OTP_TIMEOUT_ERROR).build());

    let out = cli().state(&state).args(&["status", "wa_agent1_1000", "--json"]).passes();
    let json: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();

    assert_eq!(json["job_id"], "wa_agent1_1000");
    assert_eq!(json["status"], "timed_out");
    assert_eq!(json["error"], OTP_TIMEOUT_ERROR);
}

#[test]
fn submitted_code_is_not_printed() {
    let state = StateDir::new();
    let mut record = waiting_record("wa_agent1_1000");
    record.otp_code = Some("482193".to_string());
    state.seed(record);

    cli()
        .state(&state)
        .args(&["status", "wa_agent1_1000"])
        .passes()
        .stdout_has("OTP:     submitted")
        .stdout_lacks("482193");
}

#[test]
fn unknown_job_fails() {
    let state = StateDir::new();

    cli().state(&state).args(&["status", "wa_nobody_1"]).fails_with(1).stderr_has("job not found");
}
