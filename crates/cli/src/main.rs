// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ob: channel onboarding automation CLI

mod color;
mod commands;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use exit_error::ExitError;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("OB_GIT_HASH"));

#[derive(Parser)]
#[command(name = "ob", version = VERSION, about = "Connect messaging channels to conversational agents", styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one onboarding job until it finishes
    Run(commands::run::RunArgs),
    /// Submit the verification code for a waiting job
    Otp {
        /// Job id printed by `ob run`
        job_id: String,
        /// Verification code received by SMS
        code: String,
    },
    /// Show a job record
    Status {
        job_id: String,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resume or fail jobs left unfinished by an earlier process
    Recover,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => commands::run::handle(args).await,
        Commands::Otp { job_id, code } => commands::otp::handle(&job_id, &code).await,
        Commands::Status { job_id, json } => commands::status::handle(&job_id, json).await,
        Commands::Recover => commands::recover::handle().await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = dispatch(cli).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            eprintln!("error: {}", exit);
            std::process::exit(exit.code);
        }
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
