// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wd - Warden CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod context;
mod output;
mod rpc;

use clap::{Parser, Subcommand};
use commands::{budget, daemon, doctor, nudge, plan, preflight, serve, status};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "wd",
    version,
    about = "Warden - a local reliability daemon for your coding assistant"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// Show the current state snapshot
    Status(status::StatusArgs),
    /// Scan the log tree, optionally fixing what it finds
    Preflight(preflight::PreflightArgs),
    /// Capture an evidence bundle
    Doctor(doctor::DoctorArgs),
    /// Deterministic safe remediation
    Nudge(nudge::NudgeArgs),
    /// Concurrency budget operations
    Budget(budget::BudgetArgs),
    /// Show the recovery plan
    Plan(plan::PlanArgs),
    /// Serve the tool surface over stdio JSON-RPC
    Serve(serve::ServeArgs),
}

/// Exit codes: 0 success, 1 operator error, 2 runtime error.
pub(crate) enum CliError {
    /// The operator asked for something impossible (bad id, bad flags).
    Operator(String),
    /// Something underneath failed.
    Runtime(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::Runtime(e)
    }
}

impl From<wd_core::ErrorReport> for CliError {
    fn from(report: wd_core::ErrorReport) -> Self {
        CliError::Runtime(anyhow::anyhow!("{report}"))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Daemon(args) => daemon::run(args, cli.output).await,
        Commands::Status(args) => status::run(args, cli.output).await,
        Commands::Preflight(args) => preflight::run(args, cli.output).await,
        Commands::Doctor(args) => doctor::run(args, cli.output).await,
        Commands::Nudge(args) => nudge::run(args, cli.output).await,
        Commands::Budget(args) => budget::run(args, cli.output).await,
        Commands::Plan(args) => plan::run(args, cli.output).await,
        Commands::Serve(args) => serve::run(args).await,
    };

    match result {
        Ok(()) => {}
        Err(CliError::Operator(message)) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
        Err(CliError::Runtime(e)) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}
