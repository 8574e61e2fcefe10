// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OTP rendezvous.
//!
//! The OTP arrives out of band as a write to the job's own record, so the
//! waiter only read-polls that record. Waiting suspends the job's task; it
//! never blocks a thread or other jobs.

use ob_adapters::RecordStore;
use ob_core::JobId;
use std::time::Duration;
use tokio::time::Instant;

/// Floor for the poll delay, whatever the configuration says
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polling parameters for [`await_otp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpWaitConfig {
    /// Deadline measured from the start of the wait
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Upper bound for the poll delay while the store is failing
    pub max_backoff: Duration,
}

impl Default for OtpWaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(180),
            poll_interval: Duration::from_secs(5),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl OtpWaitConfig {
    pub fn from_env() -> Self {
        Self {
            timeout: crate::env::otp_timeout(),
            poll_interval: crate::env::otp_poll_interval(),
            max_backoff: crate::env::otp_max_backoff(),
        }
    }

    ob_core::setters! {
        set {
            timeout: Duration,
            poll_interval: Duration,
            max_backoff: Duration,
        }
    }

    fn poll(&self) -> Duration {
        self.poll_interval.max(MIN_POLL_INTERVAL)
    }

    fn backoff(&self, delay: Duration) -> Duration {
        delay.saturating_mul(2).min(self.max_backoff).max(self.poll())
    }
}

/// Outcome of an OTP wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpWait {
    /// The code exactly as written to the record
    Received(String),
    TimedOut { waited: Duration },
}

/// Poll the job record until an OTP is present or the deadline passes.
///
/// Store errors and a missing record count as "not yet"; only the deadline
/// ends the wait. After a read error the delay doubles up to `max_backoff`
/// and drops back to `poll_interval` on the next good read. Delays never go
/// below [`MIN_POLL_INTERVAL`].
pub async fn await_otp<S: RecordStore>(store: &S, job_id: &JobId, config: &OtpWaitConfig) -> OtpWait {
    let start = Instant::now();
    let deadline = start + config.timeout;
    let mut delay = config.poll();
    let mut polls = 0u32;

    loop {
        polls += 1;
        match store.get(job_id).await {
            Ok(Some(record)) => {
                if let Some(code) = record.supplied_otp() {
                    tracing::info!(
                        %job_id,
                        polls,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "otp received"
                    );
                    return OtpWait::Received(code.to_string());
                }
                delay = config.poll();
            }
            Ok(None) => {
                tracing::debug!(%job_id, "record not visible yet");
                delay = config.poll();
            }
            Err(e) => {
                delay = config.backoff(delay);
                tracing::warn!(%job_id, error = %e, next_poll_ms = delay.as_millis() as u64, "otp poll failed");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            let waited = now - start;
            tracing::warn!(%job_id, polls, waited_ms = waited.as_millis() as u64, "otp wait timed out");
            return OtpWait::TimedOut { waited };
        }
        tokio::time::sleep(delay.min(deadline - now)).await;
    }
}

#[cfg(test)]
#[path = "rendezvous_tests.rs"]
mod tests;
