// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd nudge` - deterministic safe remediation.

use crate::context::build_tools;
use crate::output::{print_json, OutputFormat};
use crate::CliError;
use clap::Args;

#[derive(Args)]
pub struct NudgeArgs {}

pub async fn run(_args: NudgeArgs, output: OutputFormat) -> Result<(), CliError> {
    let (_config, tools) = build_tools()?;
    let reply = tools.nudge().await?;

    match output {
        OutputFormat::Json => print_json(&reply).map_err(CliError::Runtime)?,
        OutputFormat::Text => {
            if reply.actions.is_empty() {
                println!("nothing to do");
            } else {
                for action in &reply.actions {
                    println!("- {}", action);
                }
            }
        }
    }
    Ok(())
}
