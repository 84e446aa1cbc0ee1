// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd status` - show the current snapshot.

use crate::context::build_tools;
use crate::output::{print_json, render_status, OutputFormat};
use crate::CliError;
use clap::Args;

#[derive(Args)]
pub struct StatusArgs {}

pub async fn run(_args: StatusArgs, output: OutputFormat) -> Result<(), CliError> {
    let (_config, tools) = build_tools()?;
    let reply = tools.status().await?;

    match output {
        OutputFormat::Json => print_json(&reply).map_err(CliError::Runtime)?,
        OutputFormat::Text => print!("{}", render_status(&reply)),
    }
    Ok(())
}
