// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ob-core: Domain types for channel onboarding automation jobs

pub mod macros;

pub mod clock;
pub mod credentials;
pub mod id;
pub mod record;
pub mod script;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use credentials::Credentials;
pub use id::{JobId, SessionId};
#[cfg(any(test, feature = "test-support"))]
pub use record::AutomationRecordBuilder;
pub use record::{
    AutomationRecord, NewRecord, PatchRejected, Phase, RecordPatch, RecordStatus, OTP_TIMEOUT_ERROR,
};
pub use script::{login_script, otp_entry_script, TaskScript, AWAITING_CODE_MARKER};
pub use state::{JobEvent, JobState, TransitionError};
