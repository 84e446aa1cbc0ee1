// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable knobs for the daemon.
//!
//! Everything here has a sensible default; the variables exist for tests
//! and unusual installs, not day-to-day configuration.

use std::path::PathBuf;
use std::time::Duration;

/// `WD_DATA_DIR` - override the per-user data directory.
pub fn data_dir() -> Option<PathBuf> {
    std::env::var_os("WD_DATA_DIR").map(PathBuf::from)
}

/// `WD_WATCH_TREE` - override the watched log tree.
pub fn watch_tree() -> Option<PathBuf> {
    std::env::var_os("WD_WATCH_TREE").map(PathBuf::from)
}

/// `WD_POLL_MS` - override the poll interval (tests only).
pub fn poll_interval() -> Option<Duration> {
    std::env::var("WD_POLL_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// `WD_MAX_LOG_DIR_MB` - log-tree size knob.
pub fn max_log_dir_mb() -> Option<u64> {
    std::env::var("WD_MAX_LOG_DIR_MB")
        .ok()
        .and_then(|v| v.parse().ok())
}

/// `WD_HANG_SECONDS` - hang-no-activity knob.
pub fn hang_seconds() -> Option<u64> {
    std::env::var("WD_HANG_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
}

/// `WD_AUTO_FIX` - run aggressive log cleanup when disk is low.
pub fn auto_fix() -> Option<bool> {
    std::env::var("WD_AUTO_FIX")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
