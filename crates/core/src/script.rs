// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Natural-language task scripts handed to the browser-automation engine.
//!
//! The templates live here and nowhere else; call sites only supply parameters.

use crate::credentials::Credentials;
use std::fmt;

/// Text the login script asks the engine to finish with once it reaches the
/// verification code screen.
pub const AWAITING_CODE_MARKER: &str = "Awaiting code";

const SIGN_IN_URL: &str = "https://elevenlabs.io/app/sign-in";

/// An ordered list of instructions for one engine run.
#[derive(Clone, PartialEq, Eq)]
pub struct TaskScript {
    steps: Vec<String>,
}

impl TaskScript {
    pub fn new(steps: Vec<String>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Numbered instruction text as sent to the engine.
    pub fn render(&self) -> String {
        if self.steps.len() == 1 {
            return self.steps[0].clone();
        }
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// Scripts embed credentials and codes, so Debug only shows the shape.
impl fmt::Debug for TaskScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScript").field("steps", &self.steps.len()).finish()
    }
}

/// Phase one: sign in, reach the WhatsApp integration of the agent and stop at
/// the verification code screen for `channel_target`.
pub fn login_script(agent_id: &str, credentials: &Credentials, channel_target: &str) -> TaskScript {
    TaskScript::new(vec![
        format!("Go to {}", SIGN_IN_URL),
        format!(
            "Sign in with the email \"{}\" and the password \"{}\". If a \"Sign in with Google\" \
             button is shown, ignore it and use the email/password form.",
            credentials.email,
            credentials.secret()
        ),
        "After signing in, open the 'Conversational AI' or 'Agents' section.".to_string(),
        format!("Find the agent with ID \"{}\" (or the matching name) and open it.", agent_id),
        "Open the 'Integrations' tab.".to_string(),
        "Click 'WhatsApp'.".to_string(),
        "Click the button to add a new number or configure a WhatsApp Business account."
            .to_string(),
        "When the Meta popup (Embedded Signup) appears, click 'Continue' or 'Get Started' \
         using the account that is already selected."
            .to_string(),
        "Advance to the screen that asks for the phone number.".to_string(),
        format!("Enter the number \"{}\".", channel_target),
        format!(
            "Stop at the screen that asks for the verification code (SMS/OTP) and finish \
             with: \"{}\".",
            AWAITING_CODE_MARKER
        ),
    ])
}

/// Phase two: enter the code on the screen left open by phase one.
pub fn otp_entry_script(otp_code: &str) -> TaskScript {
    TaskScript::new(vec![format!(
        "Enter the verification code {} on the current screen and finish the configuration.",
        otp_code
    )])
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
