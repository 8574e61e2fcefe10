// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

fn secs_var(name: &str) -> Option<Duration> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_secs)
}

/// OTP wait deadline (default 180s, `OB_OTP_TIMEOUT_SECS`)
pub fn otp_timeout() -> Duration {
    secs_var("OB_OTP_TIMEOUT_SECS").unwrap_or(Duration::from_secs(180))
}

/// OTP poll interval (default 5s, `OB_OTP_POLL_SECS`). Zero is ignored.
pub fn otp_poll_interval() -> Duration {
    secs_var("OB_OTP_POLL_SECS").filter(|d| !d.is_zero()).unwrap_or(Duration::from_secs(5))
}

/// Cap on the poll delay after store read errors (default 30s, `OB_OTP_MAX_BACKOFF_SECS`)
pub fn otp_max_backoff() -> Duration {
    secs_var("OB_OTP_MAX_BACKOFF_SECS").unwrap_or(Duration::from_secs(30))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
