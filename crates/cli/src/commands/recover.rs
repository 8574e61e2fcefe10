// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ob recover` - pick up jobs left behind by a previous process

use anyhow::Result;
use ob_engine::recover;

use crate::exit_error::ExitError;

pub async fn handle() -> Result<()> {
    let orchestrator = super::orchestrator()?;
    let recovery = recover(&orchestrator).await?;

    for job_id in &recovery.interrupted {
        println!("Marked {} failed (interrupted)", job_id);
    }
    for job_id in &recovery.active {
        println!("Skipped {} (updated recently, may still be running)", job_id);
    }
    if recovery.resumed.is_empty() {
        println!(
            "Nothing to resume ({} interrupted, {} finished)",
            recovery.interrupted.len(),
            recovery.finished
        );
        return Ok(());
    }
    for job_id in recovery.resumed_ids() {
        println!("Resumed {}, waiting for its verification code", job_id);
    }

    let mut failures = 0;
    for (job_id, result) in recovery.join().await {
        match result {
            Ok(report) => println!("Job {} completed: {}", job_id, report.output),
            Err(e) => {
                failures += 1;
                eprintln!("Job {} failed: {}", job_id, e);
            }
        }
    }
    if failures > 0 {
        return Err(ExitError::failed(format!("{} resumed job(s) did not complete", failures)).into());
    }
    Ok(())
}
