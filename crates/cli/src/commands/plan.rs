// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd plan` - the deterministic recovery plan.

use crate::context::build_tools;
use crate::output::{print_json, render_plan, OutputFormat};
use crate::CliError;
use clap::Args;

#[derive(Args)]
pub struct PlanArgs {}

pub async fn run(_args: PlanArgs, output: OutputFormat) -> Result<(), CliError> {
    let (_config, tools) = build_tools()?;
    let plan = tools.recovery_plan().await?;

    match output {
        OutputFormat::Json => print_json(&plan).map_err(CliError::Runtime)?,
        OutputFormat::Text => print!("{}", render_plan(&plan)),
    }
    Ok(())
}
