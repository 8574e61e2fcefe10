// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosted browser-automation engine over HTTP.
//!
//! Sessions and tasks are remote resources:
//!
//! ```text
//! POST  /sessions                      -> { id }
//! GET   /sessions/{id}                 -> { id, status }
//! PATCH /sessions/{id} {action:"stop"}
//! POST  /tasks {task, sessionId}       -> { id }
//! GET   /tasks/{id}                    -> { status, output }
//! ```
//!
//! A `run` creates a task inside the session and polls it until it finishes
//! or stops.

use super::{BrowserEngine, BrowserSession, EngineError, EngineOutput};
use async_trait::async_trait;
use ob_core::{SessionId, TaskScript};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

const API_KEY_HEADER: &str = "X-Browser-Use-API-Key";

pub const DEFAULT_API_URL: &str = "https://api.browser-use.com/api/v2";

/// Connection settings for the hosted engine
#[derive(Clone)]
pub struct CloudConfig {
    pub base_url: String,
    pub api_key: String,
    /// Delay between task status polls inside one `run`
    pub poll_interval: Duration,
}

impl CloudConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            poll_interval: Duration::from_secs(2),
        }
    }

    ob_core::setters! {
        into {
            base_url: String,
        }
        set {
            poll_interval: Duration,
        }
    }
}

impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

/// State of a remote task as reported by one status poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TaskPoll {
    Pending,
    Finished(String),
    Stopped(String),
}

/// Map a task status JSON response to a [`TaskPoll`].
pub(crate) fn parse_task_poll(json: &Value) -> TaskPoll {
    let status = json.get("status").and_then(|v| v.as_str()).unwrap_or("unknown");
    let output = json.get("output").and_then(|v| v.as_str()).unwrap_or("").to_string();
    match status {
        "finished" => {
            // A finished task can still report that it did not achieve its goal
            if json.get("isSuccess").and_then(|v| v.as_bool()) == Some(false) {
                let reason = if output.is_empty() { "task reported failure".to_string() } else { output };
                TaskPoll::Stopped(reason)
            } else {
                TaskPoll::Finished(output)
            }
        }
        "stopped" | "failed" => {
            let reason = if output.is_empty() { format!("task {}", status) } else { output };
            TaskPoll::Stopped(reason)
        }
        _ => TaskPoll::Pending,
    }
}

/// Extract the `id` field of a created resource.
pub(crate) fn parse_id(json: &Value, resource: &str) -> Result<String, EngineError> {
    json.get("id")
        .and_then(|v| v.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| EngineError::Protocol(format!("{} response has no id", resource)))
}

fn truncate(body: &str) -> &str {
    let end = body.char_indices().nth(200).map(|(i, _)| i).unwrap_or(body.len());
    &body[..end]
}

/// Browser engine backed by a hosted browser-automation API
#[derive(Clone)]
pub struct CloudBrowserEngine {
    client: reqwest::Client,
    config: Arc<CloudConfig>,
}

impl CloudBrowserEngine {
    pub fn new(config: CloudConfig) -> Self {
        Self { client: reqwest::Client::new(), config: Arc::new(config) }
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, EngineError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut request =
            self.client.request(method, &url).header(API_KEY_HEADER, &self.config.api_key);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response =
            request.send().await.map_err(|e| EngineError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| EngineError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(EngineError::Transport(format!("{} {}: {}", status, path, truncate(&text))));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| EngineError::Protocol(format!("{}: {}", path, e)))
    }

    async fn wait_for_task(&self, task_id: &str) -> Result<EngineOutput, EngineError> {
        loop {
            tokio::time::sleep(self.config.poll_interval).await;
            let json = self.call(Method::GET, &format!("tasks/{}", task_id), None).await?;
            match parse_task_poll(&json) {
                TaskPoll::Pending => continue,
                TaskPoll::Finished(output) => return Ok(EngineOutput::new(output)),
                TaskPoll::Stopped(reason) => return Err(EngineError::TaskFailed(reason)),
            }
        }
    }
}

#[async_trait]
impl BrowserEngine for CloudBrowserEngine {
    async fn open_session(&self) -> Result<BrowserSession, EngineError> {
        let json = self
            .call(Method::POST, "sessions", Some(json!({})))
            .await
            .map_err(|e| EngineError::Session(e.to_string()))?;
        let id = parse_id(&json, "session")?;
        tracing::info!(session_id = %id, "browser session opened");
        Ok(BrowserSession::new(SessionId::new(id)))
    }

    async fn attach_session(&self, id: &SessionId) -> Result<BrowserSession, EngineError> {
        let json = self
            .call(Method::GET, &format!("sessions/{}", id), None)
            .await
            .map_err(|e| EngineError::Session(e.to_string()))?;
        match json.get("status").and_then(|v| v.as_str()) {
            Some("stopped") => Err(EngineError::Session(format!("session {} is stopped", id))),
            _ => {
                tracing::info!(session_id = %id, "browser session re-attached");
                Ok(BrowserSession::new(id.clone()))
            }
        }
    }

    async fn run(
        &self,
        script: &TaskScript,
        session: &BrowserSession,
    ) -> Result<EngineOutput, EngineError> {
        let span = tracing::info_span!("engine.run", session_id = %session.id(), steps = script.steps().len());
        async {
            let start = Instant::now();
            let body = json!({ "task": script.render(), "sessionId": session.id().as_str() });
            let created = self.call(Method::POST, "tasks", Some(body)).await?;
            let task_id = parse_id(&created, "task")?;
            tracing::info!(%task_id, "task created");

            let result = self.wait_for_task(&task_id).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => tracing::info!(%task_id, elapsed_ms, "task finished"),
                Err(e) => tracing::warn!(%task_id, elapsed_ms, error = %e, "task stopped"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn release(&self, session: BrowserSession) -> Result<(), EngineError> {
        self.call(
            Method::PATCH,
            &format!("sessions/{}", session.id()),
            Some(json!({ "action": "stop" })),
        )
        .await?;
        tracing::info!(session_id = %session.id(), "browser session released");
        Ok(())
    }
}

#[cfg(test)]
#[path = "cloud_tests.rs"]
mod tests;
