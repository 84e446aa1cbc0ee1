// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wd daemon` - start, stop, and inspect the polling daemon.

use crate::output::{print_json, OutputFormat};
use crate::CliError;
use anyhow::Context as _;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use wd_core::{Clock, SystemClock};
use wd_daemon::{read_locked_pid, Config};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start wdd in the background
    Start,
    /// Ask a running wdd to exit
    Stop,
    /// Report whether wdd is running and how fresh its state is
    Status,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DaemonStatus {
    running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
    state_age_seconds: Option<u64>,
    auto_restart: bool,
}

pub async fn run(args: DaemonArgs, output: OutputFormat) -> Result<(), CliError> {
    let config = Config::load()
        .context("failed to resolve warden configuration")
        .map_err(CliError::Runtime)?;

    match args.command {
        DaemonCommand::Start => start(&config),
        DaemonCommand::Stop => stop(&config),
        DaemonCommand::Status => status(&config, output),
    }
}

/// Spawn `wdd` (a sibling of this binary) and wait for its READY line.
fn start(config: &Config) -> Result<(), CliError> {
    let wdd = sibling_binary("wdd").map_err(CliError::Runtime)?;

    let mut child = Command::new(&wdd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {}", wdd.display()))
        .map_err(CliError::Runtime)?;

    // wdd prints READY once the lock is held and the loop is live
    let stdout = child.stdout.take();
    let ready = stdout
        .map(|out| {
            BufReader::new(out)
                .lines()
                .map_while(Result::ok)
                .any(|line| line.trim() == "READY")
        })
        .unwrap_or(false);

    if ready {
        println!(
            "wdd started (pid {})",
            read_locked_pid(config).unwrap_or(child.id())
        );
        Ok(())
    } else {
        Err(CliError::Runtime(anyhow::anyhow!(
            "wdd exited before READY; see {}",
            config.log_path.display()
        )))
    }
}

/// Signal our own daemon to exit. This is the one process Warden ever
/// signals; the watched assistant is never touched.
fn stop(config: &Config) -> Result<(), CliError> {
    let Some(pid) = read_locked_pid(config) else {
        return Err(CliError::Operator("wdd is not running".to_string()));
    };

    let status = Command::new("kill")
        .arg("-TERM")
        .arg(pid.to_string())
        .status()
        .context("failed to run kill")
        .map_err(CliError::Runtime)?;

    if status.success() {
        println!("stopped wdd (pid {pid})");
        Ok(())
    } else {
        Err(CliError::Operator(format!(
            "could not signal pid {pid}; is wdd running?"
        )))
    }
}

fn status(config: &Config, output: OutputFormat) -> Result<(), CliError> {
    let store = config.store();
    let state = store
        .load_state()
        .map(|loaded| loaded.value)
        .unwrap_or_default();

    let now_ms = SystemClock.epoch_ms();
    let state_age_seconds = (state.updated_at_ms > 0)
        .then(|| now_ms.saturating_sub(state.updated_at_ms) / 1000);
    let running = state.is_fresh(now_ms) && state.daemon_running;

    let report = DaemonStatus {
        running,
        pid: state.daemon_pid.filter(|_| running),
        state_age_seconds,
        auto_restart: config.knobs.auto_restart,
    };

    match output {
        OutputFormat::Json => print_json(&report).map_err(CliError::Runtime)?,
        OutputFormat::Text => {
            if report.running {
                println!(
                    "wdd running (pid {})",
                    report.pid.map(|p| p.to_string()).unwrap_or_default()
                );
            } else {
                println!("wdd not running");
            }
            match report.state_age_seconds {
                Some(age) => println!("state: {}s old", age),
                None => println!("state: never written"),
            }
        }
    }
    Ok(())
}

/// Locate a binary shipped next to the current executable.
fn sibling_binary(name: &str) -> anyhow::Result<std::path::PathBuf> {
    let current = std::env::current_exe().context("cannot locate current executable")?;
    let dir = current
        .parent()
        .context("current executable has no parent directory")?;
    let candidate = dir.join(name);
    if candidate.exists() {
        Ok(candidate)
    } else {
        // Fall back to PATH resolution
        Ok(std::path::PathBuf::from(name))
    }
}
