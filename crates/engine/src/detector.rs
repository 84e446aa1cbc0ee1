// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composite hang-risk detection.
//!
//! The detector is a pure function of one tick's readings plus the two
//! counters the supervisor carries (process age, composite quiet). It
//! refuses to escalate on any single signal: critical requires the log
//! tree quiet AND every process CPU-low, sustained past the hang threshold
//! plus the critical margin. A quiet logger alone (the assistant is
//! thinking) or an idle-looking process that is still writing logs never
//! escalates.

use wd_core::thresholds::{
    CPU_HOT_THRESHOLD_PERCENT, CRITICAL_AFTER_SECONDS, DISK_FREE_WARNING_GB, GRACE_WINDOW_SECONDS,
    MEMORY_HIGH_THRESHOLD_MB,
};
use wd_core::{ActivitySignals, HangRisk, ProcessSample, RiskLevel};

/// One tick's inputs to the detector. No clock: time arrives as counters.
#[derive(Debug, Clone, Copy)]
pub struct DetectorInput<'a> {
    pub processes: &'a [ProcessSample],
    pub activity: &'a ActivitySignals,
    /// `None` when the disk probe failed this tick.
    pub disk_free_gb: Option<f64>,
    /// The user-facing hang threshold (composite quiet beyond it is a
    /// hang signal).
    pub hang_threshold_seconds: u64,
    /// Seconds since processes were first observed; 0 when none.
    pub process_age_seconds: u64,
    /// Seconds both hang signals have held simultaneously.
    pub composite_quiet_seconds: u64,
}

/// Assess one tick. Evaluation order is load-bearing: grace shields
/// hang-based escalation but never disk pressure.
pub fn assess(input: &DetectorInput) -> HangRisk {
    let grace_remaining = GRACE_WINDOW_SECONDS.saturating_sub(input.process_age_seconds);

    let cpu_hot = input
        .processes
        .iter()
        .any(|p| p.cpu_percent > CPU_HOT_THRESHOLD_PERCENT);
    let memory_high = input
        .processes
        .iter()
        .any(|p| p.memory_mb > MEMORY_HIGH_THRESHOLD_MB);
    let disk_low = input
        .disk_free_gb
        .is_some_and(|gb| gb >= 0.0 && gb < DISK_FREE_WARNING_GB);

    let log_quiet = input.activity.log_quiet(input.hang_threshold_seconds);
    let cpu_low = !input.activity.cpu_active;
    let quiet = input.composite_quiet_seconds;

    let hang_signal = log_quiet && cpu_low && quiet > input.hang_threshold_seconds;

    let level = if grace_remaining > 0 {
        if disk_low {
            RiskLevel::Warn
        } else {
            RiskLevel::Ok
        }
    } else if hang_signal {
        if quiet > input.hang_threshold_seconds + CRITICAL_AFTER_SECONDS {
            RiskLevel::Critical
        } else {
            RiskLevel::Warn
        }
    } else if disk_low {
        RiskLevel::Warn
    } else if cpu_hot && memory_high {
        RiskLevel::Warn
    } else {
        RiskLevel::Ok
    };

    let mut reasons = Vec::new();
    if grace_remaining > 0 && !input.processes.is_empty() {
        reasons.push(format!("Startup grace: {}s remaining", grace_remaining));
    }
    if hang_signal {
        reasons.push(format!("No activity for {}s", quiet));
        reasons.push(format!("CPU idle for {}s across all processes", quiet));
    }
    if disk_low {
        if let Some(gb) = input.disk_free_gb {
            reasons.push(format!("Low disk space: {:.1} GB free", gb));
        }
    }
    if cpu_hot {
        let max = input
            .processes
            .iter()
            .map(|p| p.cpu_percent)
            .fold(0.0, f64::max);
        reasons.push(format!("CPU hot: {:.0}%", max));
    }
    if memory_high {
        let max = input.processes.iter().map(|p| p.memory_mb).max().unwrap_or(0);
        reasons.push(format!("High memory: {} MB resident", max));
    }

    HangRisk {
        level,
        no_activity_seconds: if log_quiet { quiet } else { 0 },
        cpu_low_seconds: if cpu_low { quiet } else { 0 },
        cpu_hot,
        memory_high,
        disk_low,
        grace_remaining_seconds: grace_remaining,
        reasons,
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
