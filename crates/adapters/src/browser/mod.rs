// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Browser-automation engine adapters
//!
//! The engine interprets natural-language task scripts and drives a browser.
//! Its planning is opaque here: one `run` call either returns an output or
//! an error.
//!
//! # Session handles
//!
//! ```text
//! open_session ──▶ BrowserSession ──▶ run(login) ──▶ (OTP wait) ──▶ run(otp entry) ──▶ release
//!                      │                                                  ▲
//!                      └──────────── same handle, never rebuilt ──────────┘
//! ```
//!
//! `BrowserSession` is not `Clone`. Each constructed handle carries a
//! process-unique [`HandleId`], so two handles compare equal only when they
//! are the same object.

mod cloud;
pub use cloud::{CloudBrowserEngine, CloudConfig};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBrowserEngine, RunCall};

use async_trait::async_trait;
use ob_core::{SessionId, TaskScript};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors from browser engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("session error: {0}")]
    Session(String),
    #[error("task failed: {0}")]
    TaskFailed(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected engine response: {0}")]
    Protocol(String),
}

/// Identity of one in-process session handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Live browser session, exclusively owned by one job
#[derive(Debug)]
pub struct BrowserSession {
    id: SessionId,
    handle: HandleId,
}

impl BrowserSession {
    /// Wrap an engine session id in a fresh handle
    pub fn new(id: SessionId) -> Self {
        Self { id, handle: HandleId(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)) }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn handle_id(&self) -> HandleId {
        self.handle
    }

    /// True only for the very same handle, not merely the same engine session
    #[cfg(any(test, feature = "test-support"))]
    pub fn same_as(&self, other: &BrowserSession) -> bool {
        self.handle == other.handle
    }
}

/// Final output of one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub text: String,
}

impl EngineOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for EngineOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Adapter for a browser-automation engine
#[async_trait]
pub trait BrowserEngine: Clone + Send + Sync + 'static {
    /// Start a fresh browser session
    async fn open_session(&self) -> Result<BrowserSession, EngineError>;

    /// Re-attach to a session that outlived this process
    async fn attach_session(&self, id: &SessionId) -> Result<BrowserSession, EngineError>;

    /// Run one task script to completion inside `session`.
    ///
    /// Treated as atomic: there is no cancellation once started.
    async fn run(
        &self,
        script: &TaskScript,
        session: &BrowserSession,
    ) -> Result<EngineOutput, EngineError>;

    /// Close the session. Consumes the handle so it cannot be reused.
    async fn release(&self, session: BrowserSession) -> Result<(), EngineError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
