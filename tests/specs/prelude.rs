// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for specs.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use ob_adapters::{FakeBrowserEngine, FakeStore, RecordStore};
pub use ob_core::test_support::test_credentials;
pub use ob_core::{
    AutomationRecord, FakeClock, JobEvent, JobId, JobState, Phase, RecordPatch, RecordStatus,
    AWAITING_CODE_MARKER, OTP_TIMEOUT_ERROR,
};
pub use ob_engine::{submit_otp, OnboardingError, OnboardingRequest, Orchestrator};
pub use tokio::time::Instant;

pub const TARGET: &str = "+551199999999";

// ---------------------------------------------------------------------------
// Orchestrator harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub orchestrator: Orchestrator<FakeBrowserEngine, FakeStore, FakeClock>,
    pub engine: FakeBrowserEngine,
    pub store: FakeStore,
}

impl Harness {
    pub fn new() -> Self {
        let store = FakeStore::new();
        let engine = FakeBrowserEngine::new();
        let orchestrator =
            Orchestrator::with_clock(engine.clone(), store.clone(), store.clock().clone());
        Self { orchestrator, engine, store }
    }

    pub fn request(agent_id: &str) -> OnboardingRequest {
        OnboardingRequest::new(agent_id, test_credentials(), TARGET)
    }

    /// Write `code` into the job record after `after` of (paused) time.
    pub fn deliver_otp_after(&self, job_id: &JobId, code: &str, after: Duration) {
        let store = self.store.clone();
        let job_id = job_id.clone();
        let code = code.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            submit_otp(&store, &job_id, &code).await.unwrap();
        });
    }

    pub fn record(&self, job_id: &str) -> AutomationRecord {
        self.store.snapshot(job_id).unwrap()
    }

    /// Patches the orchestrator wrote (status or phase changes)
    pub fn transitions(&self, job_id: &str) -> Vec<RecordPatch> {
        self.store
            .updates_for(job_id)
            .into_iter()
            .filter(|p| p.status.is_some() || p.phase.is_some())
            .collect()
    }

    /// Written statuses never move backward along the status order.
    pub fn assert_monotone(&self, job_id: &str) {
        let ranks: Vec<u8> =
            self.transitions(job_id).iter().filter_map(|p| p.status.map(|s| s.rank())).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "status moved backward: {:?}", ranks);
    }
}

const EVENTS: [JobEvent; 6] = [
    JobEvent::LoginStarted,
    JobEvent::LoginSucceeded,
    JobEvent::OtpReceived,
    JobEvent::OtpTimedOut,
    JobEvent::OtpEntered,
    JobEvent::Failed,
];

/// Every consecutive pair in `history` is an edge of the state machine.
pub fn assert_valid_history(history: &[JobState]) {
    for pair in history.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        assert!(
            EVENTS.iter().any(|e| from.on(*e) == Ok(to)),
            "no transition {} -> {} in {:?}",
            from,
            to,
            history
        );
    }
}

// ---------------------------------------------------------------------------
// CLI harness
// ---------------------------------------------------------------------------

/// Temporary state directory holding one JSON document per job
pub struct StateDir {
    dir: tempfile::TempDir,
}

impl StateDir {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn record_path(&self, job_id: &str) -> PathBuf {
        self.dir.path().join(format!("{}.json", job_id))
    }

    pub fn seed(&self, record: AutomationRecord) {
        let path = self.record_path(record.job_id.as_str());
        std::fs::write(path, serde_json::to_vec_pretty(&record).unwrap()).unwrap();
    }

    pub fn read(&self, job_id: &str) -> AutomationRecord {
        let bytes = std::fs::read(self.record_path(job_id)).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// All records on disk
    pub fn records(&self) -> Vec<AutomationRecord> {
        std::fs::read_dir(self.path())
            .unwrap()
            .filter_map(|entry| {
                let path = entry.unwrap().path();
                (path.extension()? == "json").then(|| path)
            })
            .map(|path| serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap())
            .collect()
    }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

/// `ob` with a clean environment
pub fn cli() -> CliBuilder {
    let mut cmd = assert_cmd::Command::cargo_bin("ob").unwrap();
    for var in [
        "OB_STATE_DIR",
        "BROWSER_USE_API_KEY",
        "OB_BROWSER_API_URL",
        "OB_LOGIN_SECRET",
        "OB_OTP_TIMEOUT_SECS",
        "OB_OTP_POLL_SECS",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1").env("RUST_LOG", "warn").timeout(Duration::from_secs(60));
    CliBuilder { cmd }
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn state(self, state: &StateDir) -> Self {
        let dir = state.path().display().to_string();
        self.env("OB_STATE_DIR", &dir)
    }

    /// Engine settings pointing at a closed local port
    pub fn unreachable_engine(self) -> Self {
        self.env("BROWSER_USE_API_KEY", "bu_test").env("OB_BROWSER_API_URL", "http://127.0.0.1:9")
    }

    pub fn passes(mut self) -> CliOutput {
        let output = self.cmd.output().unwrap();
        let out = CliOutput::from(output.clone());
        assert!(output.status.success(), "expected success\n{}", out);
        out
    }

    pub fn fails_with(mut self, code: i32) -> CliOutput {
        let output = self.cmd.output().unwrap();
        let out = CliOutput::from(output.clone());
        assert_eq!(output.status.code(), Some(code), "unexpected exit code\n{}", out);
        out
    }
}

pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for CliOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl std::fmt::Display for CliOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "--- stdout ---\n{}\n--- stderr ---\n{}", self.stdout, self.stderr)
    }
}

impl CliOutput {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {:?}\n{}", needle, self);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout unexpectedly has {:?}\n{}", needle, self);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {:?}\n{}", needle, self);
        self
    }
}

/// A record parked at `awaiting_otp`
pub fn waiting_record(job_id: &str) -> AutomationRecord {
    AutomationRecord::builder()
        .job_id(job_id)
        .status(RecordStatus::Waiting)
        .phase(Phase::AwaitingOtp)
        .browser_session_id("remote-1")
        .build()
}
