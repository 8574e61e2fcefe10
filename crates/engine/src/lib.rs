// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ob-engine: Onboarding job orchestration
//!
//! Drives one job through login, the OTP rendezvous and OTP entry on a
//! single browser session, persisting every state transition.

pub mod env;
mod error;
mod orchestrator;
mod recovery;
mod rendezvous;
mod submit;

pub use error::OnboardingError;
pub use orchestrator::{OnboardingReport, OnboardingRequest, Orchestrator};
pub use recovery::{recover, Recovery, ResumedJob, INTERRUPTED_ERROR};
pub use rendezvous::{await_otp, OtpWait, OtpWaitConfig, MIN_POLL_INTERVAL};
pub use submit::{submit_otp, SubmitOtpError};
