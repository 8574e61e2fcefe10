// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Onboarding job orchestrator.
//!
//! One job owns one browser session from login to release:
//!
//! ```text
//! create record ─▶ open session ─▶ run(login) ─▶ await_otp ─▶ run(otp entry) ─▶ release
//!                       └────────── &BrowserSession, never rebuilt ──────────┘
//! ```
//!
//! Every state transition is persisted with exactly one `update` before the
//! next step starts. Errors are recorded on the job before they are returned.

use crate::error::OnboardingError;
use crate::rendezvous::{await_otp, OtpWait, OtpWaitConfig};
use ob_adapters::{BrowserEngine, BrowserSession, EngineError, EngineOutput, RecordStore, StoreError};
use ob_core::{
    login_script, otp_entry_script, Clock, Credentials, JobEvent, JobId, JobState, NewRecord,
    RecordPatch, SessionId, SystemClock, OTP_TIMEOUT_ERROR,
};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Inputs for one onboarding job
#[derive(Debug, Clone)]
pub struct OnboardingRequest {
    pub agent_id: String,
    pub credentials: Credentials,
    /// Channel destination, e.g. the phone number being connected
    pub channel_target: String,
}

impl OnboardingRequest {
    pub fn new(
        agent_id: impl Into<String>,
        credentials: Credentials,
        channel_target: impl Into<String>,
    ) -> Self {
        Self { agent_id: agent_id.into(), credentials, channel_target: channel_target.into() }
    }
}

/// Result of a job that reached `completed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingReport {
    pub job_id: JobId,
    /// Output of the OTP-entry run
    pub output: EngineOutput,
    /// Every state the job passed through in this process, in order
    pub history: Vec<JobState>,
}

/// Tracks one job's live state and persists each transition.
struct JobRun<'a, S> {
    store: &'a S,
    job_id: JobId,
    state: JobState,
    history: Vec<JobState>,
}

impl<'a, S: RecordStore> JobRun<'a, S> {
    fn new(store: &'a S, job_id: JobId, state: JobState) -> Self {
        Self { store, job_id, state, history: vec![state] }
    }

    async fn advance(&mut self, event: JobEvent) -> Result<(), OnboardingError> {
        self.advance_with(event, |patch| patch).await
    }

    /// Apply `event` and write the new state's patch, extended by `extend`.
    async fn advance_with(
        &mut self,
        event: JobEvent,
        extend: impl FnOnce(RecordPatch) -> RecordPatch,
    ) -> Result<(), OnboardingError> {
        let next = self
            .state
            .on(event)
            .map_err(|source| OnboardingError::Transition { job_id: self.job_id.clone(), source })?;
        let patch = extend(next.entry_patch());
        if let Err(source) = self.store.update(&self.job_id, patch).await {
            tracing::error!(job_id = %self.job_id, state = %next, error = %source, "transition write failed");
            self.abandon(&source).await;
            return Err(OnboardingError::Store { job_id: self.job_id.clone(), source });
        }
        self.enter(next, event);
        Ok(())
    }

    fn enter(&mut self, next: JobState, event: JobEvent) {
        tracing::info!(job_id = %self.job_id, from = %self.state, to = %next, %event, "job transition");
        self.state = next;
        self.history.push(next);
    }

    /// Best-effort `failed` write after a transition write was lost.
    async fn abandon(&mut self, cause: &StoreError) {
        let Ok(next) = self.state.on(JobEvent::Failed) else {
            return;
        };
        let patch = next.entry_patch().error(format!("record store write failed: {}", cause));
        match self.store.update(&self.job_id, patch).await {
            Ok(()) => self.enter(next, JobEvent::Failed),
            Err(e) => {
                tracing::warn!(job_id = %self.job_id, error = %e, "could not record failure, record may be stale")
            }
        }
    }

    /// Record an engine failure and build the error to return.
    async fn fail(&mut self, source: EngineError) -> OnboardingError {
        let message = source.to_string();
        match self.advance_with(JobEvent::Failed, |patch| patch.error(message)).await {
            Ok(()) => OnboardingError::Engine { job_id: self.job_id.clone(), source },
            Err(e) => e,
        }
    }
}

/// Runs onboarding jobs against an injected engine, store and clock
#[derive(Clone)]
pub struct Orchestrator<E, S, C = SystemClock> {
    engine: E,
    store: S,
    clock: C,
    otp_wait: OtpWaitConfig,
}

impl<E: BrowserEngine, S: RecordStore> Orchestrator<E, S, SystemClock> {
    pub fn new(engine: E, store: S) -> Self {
        Self::with_clock(engine, store, SystemClock)
    }
}

impl<E: BrowserEngine, S: RecordStore, C: Clock> Orchestrator<E, S, C> {
    pub fn with_clock(engine: E, store: S, clock: C) -> Self {
        Self { engine, store, clock, otp_wait: OtpWaitConfig::default() }
    }

    pub fn otp_wait(mut self, config: OtpWaitConfig) -> Self {
        self.otp_wait = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn otp_wait_config(&self) -> &OtpWaitConfig {
        &self.otp_wait
    }

    /// Run one job to its terminal state.
    pub async fn run_onboarding(
        &self,
        request: OnboardingRequest,
    ) -> Result<OnboardingReport, OnboardingError> {
        let job_id = self.create_job(&request).await?;
        self.drive(job_id, request).await
    }

    /// Create the job record, then run the rest of the job as its own task.
    ///
    /// Returns as soon as the record exists so the caller can hand out the job id.
    pub async fn spawn(
        &self,
        request: OnboardingRequest,
    ) -> Result<(JobId, JoinHandle<Result<OnboardingReport, OnboardingError>>), OnboardingError>
    {
        let job_id = self.create_job(&request).await?;
        let this = self.clone();
        let id = job_id.clone();
        let handle = tokio::spawn(async move { this.drive(id, request).await });
        Ok((job_id, handle))
    }

    /// Continue a job persisted at `awaiting_otp`, re-attaching its session.
    pub async fn resume(&self, job_id: &JobId) -> Result<OnboardingReport, OnboardingError> {
        let record = self
            .store
            .get(job_id)
            .await
            .map_err(|source| OnboardingError::Store { job_id: job_id.clone(), source })?
            .ok_or_else(|| OnboardingError::NotFound(job_id.clone()))?;
        let state = JobState::from_record(record.status, record.phase);
        if state != JobState::AwaitingOtp {
            return Err(OnboardingError::NotResumable {
                job_id: job_id.clone(),
                reason: format!("job is {}", state),
            });
        }
        let Some(session_id) = record.browser_session_id else {
            return Err(OnboardingError::NotResumable {
                job_id: job_id.clone(),
                reason: "no browser session recorded".to_string(),
            });
        };

        let span = tracing::info_span!("onboarding.resume", %job_id, agent_id = %record.agent_id);
        async {
            let mut run = JobRun::new(&self.store, job_id.clone(), state);
            let session = match self.engine.attach_session(&SessionId::new(session_id)).await {
                Ok(session) => session,
                Err(e) => return Err(run.fail(e).await),
            };
            let result = self.otp_phase(&mut run, &session).await;
            self.release(session).await;
            let output = result?;
            Ok(OnboardingReport { job_id: job_id.clone(), output, history: run.history })
        }
        .instrument(span)
        .await
    }

    async fn create_job(&self, request: &OnboardingRequest) -> Result<JobId, OnboardingError> {
        let job_id = JobId::for_agent(&request.agent_id, self.clock.epoch_secs());
        let record = NewRecord::starting(request.agent_id.as_str(), request.channel_target.as_str());
        self.store.create(&job_id, record).await.map_err(|e| match e {
            StoreError::AlreadyExists(id) => OnboardingError::AlreadyExists(id),
            source => OnboardingError::Store { job_id: job_id.clone(), source },
        })?;
        tracing::info!(%job_id, agent_id = %request.agent_id, "job created");
        Ok(job_id)
    }

    async fn drive(
        &self,
        job_id: JobId,
        request: OnboardingRequest,
    ) -> Result<OnboardingReport, OnboardingError> {
        let span = tracing::info_span!("onboarding", %job_id, agent_id = %request.agent_id);
        async {
            let mut run = JobRun::new(&self.store, job_id.clone(), JobState::Created);
            let session = match self.engine.open_session().await {
                Ok(session) => session,
                Err(e) => {
                    // No session means the login phase failed before it ran
                    run.advance(JobEvent::LoginStarted).await?;
                    return Err(run.fail(e).await);
                }
            };

            let result = self.run_phases(&mut run, &session, &request).await;
            self.release(session).await;
            let output = result?;
            Ok(OnboardingReport { job_id: job_id.clone(), output, history: run.history })
        }
        .instrument(span)
        .await
    }

    async fn run_phases(
        &self,
        run: &mut JobRun<'_, S>,
        session: &BrowserSession,
        request: &OnboardingRequest,
    ) -> Result<EngineOutput, OnboardingError> {
        let script = login_script(&request.agent_id, &request.credentials, &request.channel_target);
        let session_id = session.id().to_string();
        run.advance_with(JobEvent::LoginStarted, |patch| patch.browser_session_id(session_id)).await?;

        match self.engine.run(&script, session).await {
            Ok(output) => tracing::debug!(output = %output, "login phase finished"),
            Err(e) => return Err(run.fail(e).await),
        }
        run.advance(JobEvent::LoginSucceeded).await?;

        self.otp_phase(run, session).await
    }

    async fn otp_phase(
        &self,
        run: &mut JobRun<'_, S>,
        session: &BrowserSession,
    ) -> Result<EngineOutput, OnboardingError> {
        let code = match await_otp(&self.store, &run.job_id, &self.otp_wait).await {
            OtpWait::Received(code) => code,
            OtpWait::TimedOut { waited } => {
                run.advance_with(JobEvent::OtpTimedOut, |patch| patch.error(OTP_TIMEOUT_ERROR)).await?;
                return Err(OnboardingError::OtpTimeout { job_id: run.job_id.clone(), waited });
            }
        };
        run.advance(JobEvent::OtpReceived).await?;

        match self.engine.run(&otp_entry_script(&code), session).await {
            Ok(output) => {
                run.advance(JobEvent::OtpEntered).await?;
                Ok(output)
            }
            Err(e) => Err(run.fail(e).await),
        }
    }

    async fn release(&self, session: BrowserSession) {
        let handle = session.handle_id();
        if let Err(e) = self.engine.release(session).await {
            tracing::warn!(%handle, error = %e, "failed to release browser session");
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
