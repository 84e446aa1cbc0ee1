// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared construction of the tool handlers for CLI commands.

use crate::CliError;
use anyhow::Context as _;
use std::sync::Arc;
use wd_core::{SystemClock, UuidIdGen};
use wd_daemon::Config;
use wd_engine::Tools;
use wd_probes::{FsActivityProbe, SysinfoDiskProbe, SysinfoProcessProbe};

/// The concrete tool-handler set every CLI command uses.
pub type CliTools = Tools<SystemClock, UuidIdGen>;

/// Build tools against the resolved config (env overrides included).
pub fn build_tools() -> Result<(Config, CliTools), CliError> {
    let config = Config::load()
        .context("failed to resolve warden configuration")
        .map_err(CliError::Runtime)?;

    let tools = Tools::new(
        config.store(),
        config.watch_tree.clone(),
        config.knobs.clone(),
        SystemClock,
        UuidIdGen,
        Arc::new(SysinfoProcessProbe::new()),
        Arc::new(SysinfoDiskProbe),
        Arc::new(FsActivityProbe::new(config.watch_tree.clone())),
    );
    Ok((config, tools))
}
