// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status command handler

use anyhow::Result;
use ob_adapters::RecordStore;
use ob_core::JobId;

use crate::exit_error::ExitError;
use crate::output;

pub async fn handle(job_id: &str, json: bool) -> Result<()> {
    let store = super::open_store()?;
    let job_id = JobId::new(job_id);
    let record = store
        .get(&job_id)
        .await?
        .ok_or_else(|| ExitError::failed(format!("job not found: {}", job_id)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        output::print_record(&record);
    }
    Ok(())
}
