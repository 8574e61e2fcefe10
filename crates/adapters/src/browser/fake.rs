// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake browser engine for testing

use super::{BrowserEngine, BrowserSession, EngineError, EngineOutput, HandleId};
use async_trait::async_trait;
use ob_core::{SessionId, TaskScript};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// One recorded `run` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCall {
    /// Rendered script text
    pub script: String,
    pub session_id: SessionId,
    pub handle: HandleId,
}

struct Outcome {
    result: Result<String, EngineError>,
    delay: Duration,
}

#[derive(Default)]
struct FakeEngineState {
    outcomes: VecDeque<Outcome>,
    runs: Vec<RunCall>,
    opened: Vec<HandleId>,
    released: Vec<HandleId>,
    attached: Vec<SessionId>,
    open_error: Option<EngineError>,
    attach_error: Option<EngineError>,
    default_delay: Duration,
    next_session: u64,
}

/// Browser engine with scripted outcomes that records every call.
///
/// Outcomes are consumed in run order across all sessions. With an empty
/// queue each run succeeds with `"done"`.
#[derive(Clone, Default)]
pub struct FakeBrowserEngine {
    inner: Arc<Mutex<FakeEngineState>>,
}

impl FakeBrowserEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every run without its own delay takes `delay` of (tokio) time
    pub fn with_delay(self, delay: Duration) -> Self {
        self.inner.lock().default_delay = delay;
        self
    }

    /// Queue a successful run returning `output`
    pub fn push_ok(&self, output: impl Into<String>) {
        let delay = self.inner.lock().default_delay;
        self.push(Ok(output.into()), delay);
    }

    /// Queue a failing run
    pub fn push_err(&self, message: impl Into<String>) {
        let delay = self.inner.lock().default_delay;
        self.push(Err(EngineError::TaskFailed(message.into())), delay);
    }

    /// Queue a run outcome with an explicit duration
    pub fn push(&self, result: Result<String, EngineError>, delay: Duration) {
        self.inner.lock().outcomes.push_back(Outcome { result, delay });
    }

    /// The next `open_session` fails
    pub fn fail_open(&self, message: impl Into<String>) {
        self.inner.lock().open_error = Some(EngineError::Session(message.into()));
    }

    /// The next `attach_session` fails
    pub fn fail_attach(&self, message: impl Into<String>) {
        self.inner.lock().attach_error = Some(EngineError::Session(message.into()));
    }

    pub fn runs(&self) -> Vec<RunCall> {
        self.inner.lock().runs.clone()
    }

    /// Runs issued against one engine session
    pub fn runs_in(&self, session_id: &str) -> Vec<RunCall> {
        self.inner.lock().runs.iter().filter(|r| r.session_id == session_id).cloned().collect()
    }

    /// Handles created by `open_session` or `attach_session`
    pub fn opened(&self) -> Vec<HandleId> {
        self.inner.lock().opened.clone()
    }

    pub fn released(&self) -> Vec<HandleId> {
        self.inner.lock().released.clone()
    }

    pub fn attached(&self) -> Vec<SessionId> {
        self.inner.lock().attached.clone()
    }
}

#[async_trait]
impl BrowserEngine for FakeBrowserEngine {
    async fn open_session(&self) -> Result<BrowserSession, EngineError> {
        let mut state = self.inner.lock();
        if let Some(err) = state.open_error.take() {
            return Err(err);
        }
        state.next_session += 1;
        let session = BrowserSession::new(SessionId::new(format!("fake-session-{}", state.next_session)));
        state.opened.push(session.handle_id());
        Ok(session)
    }

    async fn attach_session(&self, id: &SessionId) -> Result<BrowserSession, EngineError> {
        let mut state = self.inner.lock();
        state.attached.push(id.clone());
        if let Some(err) = state.attach_error.take() {
            return Err(err);
        }
        let session = BrowserSession::new(id.clone());
        state.opened.push(session.handle_id());
        Ok(session)
    }

    async fn run(
        &self,
        script: &TaskScript,
        session: &BrowserSession,
    ) -> Result<EngineOutput, EngineError> {
        let outcome = {
            let mut state = self.inner.lock();
            state.runs.push(RunCall {
                script: script.render(),
                session_id: session.id().clone(),
                handle: session.handle_id(),
            });
            let default_delay = state.default_delay;
            state
                .outcomes
                .pop_front()
                .unwrap_or(Outcome { result: Ok("done".to_string()), delay: default_delay })
        };
        if !outcome.delay.is_zero() {
            tokio::time::sleep(outcome.delay).await;
        }
        outcome.result.map(EngineOutput::new)
    }

    async fn release(&self, session: BrowserSession) -> Result<(), EngineError> {
        self.inner.lock().released.push(session.handle_id());
        Ok(())
    }
}
