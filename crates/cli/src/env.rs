// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

use ob_adapters::CloudConfig;

use crate::exit_error::ExitError;

/// Resolve state directory: OB_STATE_DIR > XDG_STATE_HOME/ob > ~/.local/state/ob
pub fn state_dir() -> Result<PathBuf, ExitError> {
    if let Ok(dir) = std::env::var("OB_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("ob"));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| ExitError::failed("cannot resolve state directory: set OB_STATE_DIR"))?;
    Ok(home.join(".local/state/ob"))
}

/// Cloud browser API key (`BROWSER_USE_API_KEY`)
pub fn browser_api_key() -> Option<String> {
    std::env::var("BROWSER_USE_API_KEY").ok().filter(|s| !s.is_empty())
}

/// Cloud browser base URL override (`OB_BROWSER_API_URL`)
pub fn browser_api_url() -> Option<String> {
    std::env::var("OB_BROWSER_API_URL").ok().filter(|s| !s.is_empty())
}

/// Task status poll interval inside the engine (default 2000ms, `OB_BROWSER_POLL_MS`)
pub fn browser_poll_interval() -> Duration {
    std::env::var("OB_BROWSER_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(2))
}

/// Login secret used when `--secret` is omitted (`OB_LOGIN_SECRET`)
pub fn login_secret() -> Option<String> {
    std::env::var("OB_LOGIN_SECRET").ok().filter(|s| !s.is_empty())
}

/// Cloud browser connection settings. Requires `BROWSER_USE_API_KEY`.
pub fn cloud_config() -> Result<CloudConfig, ExitError> {
    let key = browser_api_key()
        .ok_or_else(|| ExitError::failed("BROWSER_USE_API_KEY is not set"))?;
    let mut config = CloudConfig::new(key).poll_interval(browser_poll_interval());
    if let Some(url) = browser_api_url() {
        config = config.base_url(url);
    }
    Ok(config)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
