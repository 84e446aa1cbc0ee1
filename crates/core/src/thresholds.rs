// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The threshold table driving detection, remediation, and recovery.
//!
//! Hardcoded values are deliberate: the daemon's behavior should be
//! predictable from the source, not from a config file. The handful of
//! user-facing knobs live in [`Knobs`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling supervisor tick interval.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Free disk space below this is "disk low" (strict `<`).
pub const DISK_FREE_WARNING_GB: f64 = 5.0;

/// Plain-text log files above this size get trimmed to their tail.
pub const MAX_FILE_SIZE_MB: u64 = 25;

/// Session logs older than this are compressed in place.
pub const RETAIN_DAYS: u64 = 7;

/// Session artifacts older than this are deleted by the log manager.
pub const STALE_SESSION_DAYS: u64 = 30;

/// Lines preserved when trimming a file, and tail length in bundles.
pub const TAIL_LINES: usize = 500;

/// CPU utilization at or below this counts as "cpu low".
pub const CPU_LOW_THRESHOLD_PERCENT: f64 = 5.0;

/// CPU utilization above this is "cpu hot".
pub const CPU_HOT_THRESHOLD_PERCENT: f64 = 95.0;

/// Resident memory above this is "memory high".
pub const MEMORY_HIGH_THRESHOLD_MB: u64 = 4096;

/// Window after first seeing processes during which hang signals are shielded.
pub const GRACE_WINDOW_SECONDS: u64 = 60;

/// Composite quiet beyond hang threshold + this escalates to critical.
pub const CRITICAL_AFTER_SECONDS: u64 = 600;

/// Minimum spacing between bundle captures for any single pid.
pub const BUNDLE_COOLDOWN_SECONDS: u64 = 300;

/// Sustained-ok duration required before the cap is restored.
pub const HYSTERESIS_SECONDS: u64 = 60;

/// Concurrency caps by risk level.
pub const BASE_CAP: u32 = 4;
pub const WARN_CAP: u32 = 2;
pub const CRITICAL_CAP: u32 = 1;

/// A persisted snapshot older than this is stale.
pub const STATE_STALENESS_SECONDS: u64 = 10;

/// Upper bound on files considered when probing log-tree recency.
pub const ACTIVITY_SCAN_LIMIT: usize = 200;

/// Timeout for per-pid handle-count subprocesses.
pub const HANDLE_COUNT_TIMEOUT: Duration = Duration::from_secs(3);

/// Process-name prefix identifying assistant processes.
pub const PROCESS_NAME_PREFIX: &str = "claude";

/// Names inside the watched tree that the log manager never touches.
pub const PROTECTED_NAMES: &[&str] = &["memory", "sessions-index.json"];

/// User-facing knobs, from CLI flags and `WD_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Knobs {
    /// Log-tree size above which preflight reports the tree oversized.
    pub max_log_dir_mb: u64,
    /// Composite quiet beyond this is a hang signal.
    pub hang_no_activity_seconds: u64,
    /// Run the log manager aggressively when disk is low.
    pub auto_fix: bool,
    /// Reserved for a watchdog mode; never affects the daemon.
    pub auto_restart: bool,
}

impl Default for Knobs {
    fn default() -> Self {
        Self {
            max_log_dir_mb: 200,
            hang_no_activity_seconds: 300,
            auto_fix: false,
            auto_restart: false,
        }
    }
}

#[cfg(test)]
#[path = "thresholds_tests.rs"]
mod tests;
