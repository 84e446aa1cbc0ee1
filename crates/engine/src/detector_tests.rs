// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wd_probes::compose_signals;
use yare::parameterized;

fn proc(pid: u32, cpu: f64, mem: u64, uptime: u64) -> ProcessSample {
    ProcessSample {
        pid,
        name: "claude".to_string(),
        cpu_percent: cpu,
        memory_mb: mem,
        uptime_seconds: uptime,
        handle_count: None,
    }
}

struct Tick {
    processes: Vec<ProcessSample>,
    mtime_ago: i64,
    disk_free_gb: Option<f64>,
    process_age: u64,
    quiet: u64,
}

impl Default for Tick {
    fn default() -> Self {
        Self {
            processes: vec![proc(100, 12.0, 300, 10)],
            mtime_ago: 3,
            disk_free_gb: Some(100.0),
            process_age: 3600,
            quiet: 0,
        }
    }
}

fn assess_tick(tick: &Tick) -> HangRisk {
    let activity = compose_signals(tick.mtime_ago, &tick.processes);
    assess(&DetectorInput {
        processes: &tick.processes,
        activity: &activity,
        disk_free_gb: tick.disk_free_gb,
        hang_threshold_seconds: 300,
        process_age_seconds: tick.process_age,
        composite_quiet_seconds: tick.quiet,
    })
}

#[test]
fn cold_start_healthy_inside_grace() {
    let risk = assess_tick(&Tick {
        process_age: 10,
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Ok);
    assert_eq!(risk.grace_remaining_seconds, 50);
}

#[test]
fn grace_shields_a_quiet_new_process() {
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 0.0, 300, 15)],
        mtime_ago: 900,
        process_age: 15,
        quiet: 15,
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Ok);
    assert_eq!(risk.grace_remaining_seconds, 45);
}

#[test]
fn disk_pressure_bypasses_grace() {
    let risk = assess_tick(&Tick {
        process_age: 10,
        disk_free_gb: Some(2.0),
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Warn);
    assert!(risk.disk_low);
    assert!(risk.reasons.iter().any(|r| r.contains("Low disk space")));
}

#[test]
fn composite_quiet_triggers_warn_with_reason() {
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 0.0, 300, 3600)],
        mtime_ago: 305,
        quiet: 305,
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Warn);
    assert!(risk.reasons.iter().any(|r| r == "No activity for 305s"));
    assert_eq!(risk.no_activity_seconds, 305);
    assert_eq!(risk.cpu_low_seconds, 305);
}

#[parameterized(
    at_threshold_still_ok = { 300, RiskLevel::Ok },
    just_past_threshold_warns = { 301, RiskLevel::Warn },
    at_critical_boundary_still_warn = { 900, RiskLevel::Warn },
    past_critical_boundary = { 901, RiskLevel::Critical },
)]
fn composite_quiet_boundaries_are_strict(quiet: u64, expected: RiskLevel) {
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 0.0, 300, 3600)],
        mtime_ago: quiet as i64,
        quiet,
        ..Default::default()
    });
    assert_eq!(risk.level, expected, "quiet={quiet}");
}

#[test]
fn grace_boundary_is_exactly_expired_at_the_window() {
    // processAge == graceWindow: grace has just expired, escalation allowed
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 0.0, 300, 60)],
        mtime_ago: 400,
        process_age: 60,
        quiet: 400,
        ..Default::default()
    });
    assert_eq!(risk.grace_remaining_seconds, 0);
    assert_eq!(risk.level, RiskLevel::Warn);
}

#[parameterized(
    exactly_five_gb_is_not_low = { 5.0, false },
    just_under_five_is_low = { 4.99, true },
    unknown_is_not_low = { -1.0, false },
)]
fn disk_low_boundary(disk: f64, expect_low: bool) {
    let input = if disk < 0.0 { None } else { Some(disk) };
    let risk = assess_tick(&Tick {
        disk_free_gb: input,
        ..Default::default()
    });
    assert_eq!(risk.disk_low, expect_low);
    assert_eq!(
        risk.level,
        if expect_low { RiskLevel::Warn } else { RiskLevel::Ok }
    );
}

#[test]
fn critical_requires_both_quiet_signals() {
    // CPU active: even an ancient log mtime cannot escalate past ok
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 50.0, 300, 3600)],
        mtime_ago: 5000,
        quiet: 0,
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Ok);

    // Log active: idle CPU alone cannot escalate either
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 0.0, 300, 3600)],
        mtime_ago: 2,
        quiet: 0,
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Ok);
}

#[test]
fn hot_cpu_and_high_memory_together_warn() {
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 98.0, 5000, 3600)],
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Warn);
    assert!(risk.cpu_hot);
    assert!(risk.memory_high);
    assert!(risk.reasons.iter().any(|r| r.contains("CPU hot")));
    assert!(risk.reasons.iter().any(|r| r.contains("High memory")));

    // Either alone is not enough
    let hot_only = assess_tick(&Tick {
        processes: vec![proc(100, 98.0, 500, 3600)],
        ..Default::default()
    });
    assert_eq!(hot_only.level, RiskLevel::Ok);

    let big_only = assess_tick(&Tick {
        processes: vec![proc(100, 40.0, 5000, 3600)],
        ..Default::default()
    });
    assert_eq!(big_only.level, RiskLevel::Ok);
}

#[test]
fn unknown_log_mtime_counts_as_quiet() {
    let risk = assess_tick(&Tick {
        processes: vec![proc(100, 0.0, 300, 3600)],
        mtime_ago: -1,
        quiet: 400,
        ..Default::default()
    });
    assert_eq!(risk.level, RiskLevel::Warn);
}
