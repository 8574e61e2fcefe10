// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes

/// Define a string newtype identifier.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// `AsRef<str>`, `PartialEq<str>`, `PartialEq<&str>`, `Borrow<str>` and
/// `Deref<Target = str>`.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct JobId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

crate::define_id! {
    /// Identifier of one onboarding attempt.
    ///
    /// Minted once per job as `wa_<agent_id>_<epoch_seconds>` and used as the
    /// sole correlation key afterwards; nothing parses it back apart.
    pub struct JobId;
}

impl JobId {
    /// Compose the id for a job started by `agent_id` at `epoch_secs`.
    pub fn for_agent(agent_id: &str, epoch_secs: u64) -> Self {
        Self(format!("wa_{}_{}", agent_id, epoch_secs))
    }
}

crate::define_id! {
    /// Engine-side identifier of a browser session.
    ///
    /// Persisted on the job record so a restarted process can re-attach to
    /// the remote session. Distinct from the in-process handle identity.
    pub struct SessionId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
