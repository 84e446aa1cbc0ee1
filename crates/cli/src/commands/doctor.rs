// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd doctor` - capture an evidence bundle.

use crate::context::build_tools;
use crate::output::{print_json, OutputFormat};
use crate::CliError;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct DoctorArgs {
    /// Where to write the bundle (default: data dir, timestamped)
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,
}

pub async fn run(args: DoctorArgs, output: OutputFormat) -> Result<(), CliError> {
    let (_config, tools) = build_tools()?;
    let reply = tools.doctor(args.output_path).await?;

    match output {
        OutputFormat::Json => print_json(&reply).map_err(CliError::Runtime)?,
        OutputFormat::Text => {
            println!("bundle:  {}", reply.bundle_path.display());
            println!("entries: {}", reply.entries);
            println!("size:    {} bytes", reply.total_bytes);
        }
    }
    Ok(())
}
