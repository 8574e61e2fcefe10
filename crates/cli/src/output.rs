// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ob_core::{AutomationRecord, Clock, SystemClock};

use crate::color;

/// Format a duration in seconds as a compact string ("5s", "2m", "1h", "3d")
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

/// Format a timestamp as relative time before `now_ms`
pub fn format_time_ago(epoch_ms: u64, now_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    format!("{} ago", format_elapsed(now_ms.saturating_sub(epoch_ms) / 1000))
}

/// Human-readable job record. The OTP itself is never shown.
pub fn format_record(record: &AutomationRecord, now_ms: u64) -> String {
    let mut lines = vec![
        format!("{} {}", color::header("Job:"), record.job_id),
        format!("  Status:  {}", color::status(record.status)),
        format!("  Phase:   {}", record.phase),
        format!("  Agent:   {}", record.agent_id),
        format!("  Target:  {}", record.channel_target),
    ];
    let otp = if record.supplied_otp().is_some() { "submitted" } else { "-" };
    lines.push(format!("  OTP:     {}", otp));
    if let Some(session) = &record.browser_session_id {
        lines.push(format!("  Session: {}", color::context(session)));
    }
    if let Some(error) = &record.error {
        lines.push(format!("  Error:   {}", error));
    }
    lines.push(format!(
        "  Created: {}",
        color::muted(&format_time_ago(record.created_at_ms, now_ms))
    ));
    lines.push(format!(
        "  Updated: {}",
        color::muted(&format_time_ago(record.updated_at_ms, now_ms))
    ));
    lines.join("\n")
}

pub fn print_record(record: &AutomationRecord) {
    println!("{}", format_record(record, SystemClock.epoch_ms()));
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
