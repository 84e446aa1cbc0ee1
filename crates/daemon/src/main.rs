// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Warden Daemon (wdd)
//!
//! Background process that polls the watched assistant every two seconds
//! and rewrites the persisted snapshot. It never signals, restarts, or
//! terminates anything; the tool surface and CLI read what it writes.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use wd_core::thresholds::POLL_INTERVAL;
use wd_core::{SystemClock, UuidIdGen};
use wd_daemon::{acquire_lock, env, lifecycle, Config, LifecycleError, Supervisor};
use wd_probes::{FsActivityProbe, SysinfoDiskProbe, SysinfoProcessProbe};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("wdd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("wdd {}", env!("CARGO_PKG_VERSION"));
                println!("Warden Daemon - polls the watched assistant and persists its state");
                println!();
                println!("USAGE:");
                println!("    wdd");
                println!();
                println!("The daemon is typically started by `wd daemon start` and should");
                println!("not be invoked directly. It polls every 2 seconds and writes");
                println!("state under the warden data directory.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: wdd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    // Rotate the daemon log if it has grown too large
    rotate_log_if_needed(&config.log_path);

    let _log_guard = setup_logging(&config)?;

    info!("Starting warden daemon");

    let _lock = match acquire_lock(&config) {
        Ok(lock) => lock,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = lifecycle::read_locked_pid(&config)
                .map(|p| p.to_string())
                .unwrap_or_default();
            eprintln!("wdd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    let store = config.store();
    let mut supervisor = Supervisor::new(
        store,
        config.watch_tree.clone(),
        config.knobs.clone(),
        SystemClock,
        UuidIdGen,
        Arc::new(SysinfoProcessProbe::new()),
        Arc::new(SysinfoDiskProbe),
        Arc::new(FsActivityProbe::new(config.watch_tree.clone())),
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        tree = %config.watch_tree.display(),
        data_dir = %config.data_dir.root().display(),
        "Daemon ready, polling"
    );

    // Signal ready for the CLI waiting on startup
    println!("READY");

    // NOTE: created outside the loop - tokio::select! re-evaluates
    // branches each iteration, so constructing the interval inside would
    // reset it on every signal poll.
    let mut ticker = tokio::time::interval(poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                supervisor.tick().await;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    // Clean exit: stop ticking, flush nothing (every tick already wrote
    // atomically), release the lock on drop.
    info!("Daemon stopped");
    Ok(())
}

/// Poll interval, overridable via `WD_POLL_MS` (tests only).
fn poll_interval() -> Duration {
    env::poll_interval().unwrap_or(POLL_INTERVAL)
}

/// Maximum daemon log size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated log files to keep (daemon.log.1, .2, .3).
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate the daemon log file if it exceeds [`MAX_LOG_SIZE`].
///
/// Shifts `daemon.log` → `daemon.log.1` → `daemon.log.2` → `daemon.log.3`,
/// deleting the oldest. Best-effort: rotation failures are silently
/// ignored so the daemon still starts.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };

    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();

    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }

    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dir = config
        .log_path
        .parent()
        .ok_or_else(|| LifecycleError::Io(std::io::Error::other("log path has no parent")))?;
    let name = config
        .log_path
        .file_name()
        .ok_or_else(|| LifecycleError::Io(std::io::Error::other("log path has no file name")))?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
