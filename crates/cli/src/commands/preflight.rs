// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd preflight` - scan the log tree, optionally fixing it.

use crate::context::build_tools;
use crate::output::{print_json, render_preflight, OutputFormat};
use crate::CliError;
use clap::Args;

#[derive(Args)]
pub struct PreflightArgs {
    /// Apply fixes instead of only reporting
    #[arg(long)]
    pub fix: bool,

    /// Halve the retention window and tolerated file size
    #[arg(long, requires = "fix")]
    pub aggressive: bool,
}

pub async fn run(args: PreflightArgs, output: OutputFormat) -> Result<(), CliError> {
    let (_config, tools) = build_tools()?;
    let reply = tools.preflight(args.fix, args.aggressive).await?;

    match output {
        OutputFormat::Json => print_json(&reply).map_err(CliError::Runtime)?,
        OutputFormat::Text => print!("{}", render_preflight(&reply)),
    }
    Ok(())
}
