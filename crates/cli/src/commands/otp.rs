// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ob otp` - deliver the verification code to a waiting job

use anyhow::Result;
use ob_core::JobId;
use ob_engine::submit_otp;

use crate::exit_error::ExitError;

pub async fn handle(job_id: &str, code: &str) -> Result<()> {
    let store = super::open_store()?;
    let job_id = JobId::new(job_id);
    submit_otp(&store, &job_id, code).await.map_err(|e| ExitError::failed(e.to_string()))?;
    println!("Code submitted for job {}", job_id);
    Ok(())
}
