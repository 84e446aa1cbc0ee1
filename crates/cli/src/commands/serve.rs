// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd serve` - the stdio JSON-RPC tool server.

use crate::context::build_tools;
use crate::rpc;
use crate::CliError;
use anyhow::Context as _;
use clap::Args;

#[derive(Args)]
pub struct ServeArgs {}

pub async fn run(_args: ServeArgs) -> Result<(), CliError> {
    let (_config, tools) = build_tools()?;
    rpc::serve(tools)
        .await
        .context("stdio transport failed")
        .map_err(CliError::Runtime)
}
