// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the record store and the browser-automation engine

pub mod browser;
pub mod store;

pub use browser::{
    BrowserEngine, BrowserSession, CloudBrowserEngine, CloudConfig, EngineError, EngineOutput,
    HandleId,
};
pub use store::{FileStore, MemoryStore, RecordStore, StoreError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use browser::{FakeBrowserEngine, RunCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
