// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod otp;
pub mod recover;
pub mod run;
pub mod status;

use ob_adapters::{CloudBrowserEngine, FileStore};
use ob_engine::{OtpWaitConfig, Orchestrator};

use crate::env;
use crate::exit_error::ExitError;

/// Record store rooted at the configured state directory
pub(crate) fn open_store() -> Result<FileStore, ExitError> {
    Ok(FileStore::new(env::state_dir()?))
}

/// Orchestrator wired to the cloud browser engine and the state directory
pub(crate) fn orchestrator() -> Result<Orchestrator<CloudBrowserEngine, FileStore>, ExitError> {
    let engine = CloudBrowserEngine::new(env::cloud_config()?);
    Ok(Orchestrator::new(engine, open_store()?).otp_wait(OtpWaitConfig::from_env()))
}
