// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ob run` - run one onboarding job

use anyhow::Result;
use clap::Args;
use ob_core::Credentials;
use ob_engine::{OnboardingError, OnboardingRequest};

use crate::env;
use crate::exit_error::{ExitError, EXIT_FAILED, EXIT_TIMED_OUT};

#[derive(Args)]
pub struct RunArgs {
    /// Agent to connect the channel to
    #[arg(long)]
    pub agent: String,
    /// Platform login email
    #[arg(long)]
    pub email: String,
    /// Phone number to connect
    #[arg(long)]
    pub phone: String,
    /// Platform login secret (defaults to OB_LOGIN_SECRET)
    #[arg(long)]
    pub secret: Option<String>,
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let secret = args.secret.or_else(env::login_secret).ok_or_else(|| {
        ExitError::failed("no login secret: pass --secret or set OB_LOGIN_SECRET")
    })?;
    let orchestrator = super::orchestrator()?;
    let request = OnboardingRequest::new(args.agent, Credentials::new(args.email, secret), args.phone);

    let (job_id, handle) = orchestrator.spawn(request).await?;
    println!("Started job {}", job_id);
    println!("Submit the verification code with: ob otp {} <code>", job_id);

    match handle.await? {
        Ok(report) => {
            println!("Job {} completed: {}", report.job_id, report.output);
            Ok(())
        }
        Err(e) => Err(exit_for(&e).into()),
    }
}

/// Map a terminal job failure to its exit code.
pub(crate) fn exit_for(err: &OnboardingError) -> ExitError {
    let code = if err.is_timeout() { EXIT_TIMED_OUT } else { EXIT_FAILED };
    ExitError::new(code, err.to_string())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
