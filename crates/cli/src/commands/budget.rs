// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd budget` - lease operations against the concurrency budget.

use crate::context::build_tools;
use crate::output::{print_json, render_budget, OutputFormat};
use crate::CliError;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct BudgetArgs {
    #[command(subcommand)]
    pub command: BudgetCommand,
}

#[derive(Subcommand)]
pub enum BudgetCommand {
    /// Show the current budget and leases
    Get,
    /// Acquire slots under the current cap
    Acquire {
        /// Slots to hold
        #[arg(long, default_value_t = 1)]
        slots: u32,
        /// Lease lifetime in seconds
        #[arg(long, default_value_t = 300)]
        ttl: u64,
        /// Why the slots are needed
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Release a lease by id
    Release {
        /// Lease id from acquire
        lease_id: String,
    },
}

pub async fn run(args: BudgetArgs, output: OutputFormat) -> Result<(), CliError> {
    let (_config, tools) = build_tools()?;

    match args.command {
        BudgetCommand::Get => {
            let summary = tools.budget_get().await?;
            match output {
                OutputFormat::Json => print_json(&summary).map_err(CliError::Runtime)?,
                OutputFormat::Text => print!("{}", render_budget(&summary)),
            }
        }
        BudgetCommand::Acquire { slots, ttl, reason } => {
            let reply = tools.budget_acquire(slots, ttl, reason).await?;
            match output {
                OutputFormat::Json => print_json(&reply).map_err(CliError::Runtime)?,
                OutputFormat::Text => {
                    if reply.granted {
                        // The id is the whole point; print it bare for scripts
                        println!("{}", reply.lease_id.unwrap_or_default());
                    } else {
                        return Err(CliError::Operator(
                            reply.denial.unwrap_or_else(|| "denied".to_string()),
                        ));
                    }
                }
            }
        }
        BudgetCommand::Release { lease_id } => {
            let reply = tools.budget_release(&lease_id).await?;
            match output {
                OutputFormat::Json => print_json(&reply).map_err(CliError::Runtime)?,
                OutputFormat::Text => {
                    if reply.released {
                        println!("released {}", lease_id);
                    } else {
                        return Err(CliError::Operator(format!("no such lease: {lease_id}")));
                    }
                }
            }
        }
    }
    Ok(())
}
