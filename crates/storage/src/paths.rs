// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data-directory layout.
//!
//! Everything Warden persists lives under a single per-user state
//! directory:
//!
//! - `state.json` - latest snapshot, rewritten each poll
//! - `budget.json` - concurrency budget and leases
//! - `journal.jsonl` - append-only remediation log
//! - `incidents.jsonl` - append-only closed incidents
//! - `bundle-<timestamp>.zip` - evidence archives
//! - `daemon.log`, `daemon.pid` - daemon plumbing

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathsError {
    #[error("could not determine a home directory")]
    NoHomeDir,
}

/// Resolved locations of all persisted files.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// The default per-user data dir: `$XDG_STATE_HOME/wd` or
    /// `~/.local/state/wd`.
    pub fn resolve() -> Result<Self, PathsError> {
        if let Some(dir) = std::env::var_os("XDG_STATE_HOME") {
            let dir = PathBuf::from(dir);
            if dir.is_absolute() {
                return Ok(Self::at(dir.join("wd")));
            }
        }
        let home = dirs::home_dir().ok_or(PathsError::NoHomeDir)?;
        Ok(Self::at(home.join(".local").join("state").join("wd")))
    }

    /// A data dir at an explicit root (tests, `--data-dir`).
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn budget_path(&self) -> PathBuf {
        self.root.join("budget.json")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.root.join("journal.jsonl")
    }

    pub fn incidents_path(&self) -> PathBuf {
        self.root.join("incidents.jsonl")
    }

    pub fn bundle_path(&self, timestamp_ms: u64) -> PathBuf {
        self.root.join(format!("bundle-{}.zip", timestamp_ms))
    }

    pub fn daemon_log_path(&self) -> PathBuf {
        self.root.join("daemon.log")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join("daemon.pid")
    }
}

/// The default watched log tree: `~/.claude/projects`.
pub fn default_watched_tree() -> Result<PathBuf, PathsError> {
    let home = dirs::home_dir().ok_or(PathsError::NoHomeDir)?;
    Ok(home.join(".claude").join("projects"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
