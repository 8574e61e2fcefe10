// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("run")
        .stdout_has("otp")
        .stdout_has("status")
        .stdout_has("recover");
}

#[test]
fn run_help_shows_flags() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--agent")
        .stdout_has("--email")
        .stdout_has("--phone")
        .stdout_has("--secret");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}
