// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: configuration, lock file, startup.

use crate::env;
use fs2::FileExt;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use wd_core::Knobs;
use wd_storage::{default_watched_tree, DataDir, Store};

/// Errors that can occur during startup and shutdown.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not resolve the data directory: {0}")]
    Paths(#[from] wd_storage::PathsError),
    #[error("another wdd already holds the lock")]
    LockFailed(#[source] std::io::Error),
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root data directory (e.g. ~/.local/state/wd)
    pub data_dir: DataDir,
    /// The watched log tree (e.g. ~/.claude/projects)
    pub watch_tree: PathBuf,
    /// User-facing knobs
    pub knobs: Knobs,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
}

impl Config {
    /// Load configuration from env overrides plus defaults.
    pub fn load() -> Result<Self, LifecycleError> {
        let data_dir = match env::data_dir() {
            Some(dir) => DataDir::at(dir),
            None => DataDir::resolve()?,
        };
        let watch_tree = match env::watch_tree() {
            Some(tree) => tree,
            None => default_watched_tree()?,
        };

        let mut knobs = Knobs::default();
        if let Some(mb) = env::max_log_dir_mb() {
            knobs.max_log_dir_mb = mb;
        }
        if let Some(secs) = env::hang_seconds() {
            knobs.hang_no_activity_seconds = secs;
        }
        if let Some(auto_fix) = env::auto_fix() {
            knobs.auto_fix = auto_fix;
        }

        Ok(Self {
            log_path: data_dir.daemon_log_path(),
            lock_path: data_dir.lock_path(),
            data_dir,
            watch_tree,
            knobs,
        })
    }

    pub fn store(&self) -> Store {
        Store::new(self.data_dir.clone())
    }
}

/// Acquire the exclusive daemon lock, writing our pid into it.
///
/// The returned handle must stay alive for the daemon's lifetime; the
/// lock releases on drop.
pub fn acquire_lock(config: &Config) -> Result<File, LifecycleError> {
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::options()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&config.lock_path)?;
    file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    file.sync_all()?;
    Ok(file)
}

/// Read the pid from the lock file, if any daemon ever wrote one.
pub fn read_locked_pid(config: &Config) -> Option<u32> {
    std::fs::read_to_string(&config.lock_path)
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
