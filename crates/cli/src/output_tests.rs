// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wd_core::{Budget, HangRisk, Incident, ProcessSample, RiskLevel};

fn snapshot() -> StateSnapshot {
    StateSnapshot {
        updated_at_ms: 1_000,
        daemon_running: true,
        processes: vec![ProcessSample {
            pid: 100,
            name: "claude".to_string(),
            cpu_percent: 12.0,
            memory_mb: 300,
            uptime_seconds: 90,
            handle_count: Some(64),
        }],
        hang_risk: HangRisk {
            level: RiskLevel::Warn,
            ..Default::default()
        },
        disk_free_gb: Some(42.5),
        log_tree_size_mb: 10.0,
        composite_quiet_seconds: 305,
        ..Default::default()
    }
}

#[test]
fn status_text_includes_the_load_bearing_lines() {
    let reply = StatusReply {
        fresh: true,
        snapshot: snapshot(),
    };
    let text = render_status(&reply);
    assert!(text.contains("source:   daemon snapshot"));
    assert!(text.contains("risk:     warn"));
    assert!(text.contains("pid 100"));
    assert!(text.contains("64 handles"));
    assert!(text.contains("42.5 GB free"));
    assert!(text.contains("quiet:    5m"));
}

#[test]
fn stale_status_says_so() {
    let reply = StatusReply {
        fresh: false,
        snapshot: StateSnapshot::default(),
    };
    let text = render_status(&reply);
    assert!(text.contains("live reading"));
    assert!(text.contains("procs:    none watched"));
    assert!(text.contains("disk:     unknown"));
}

#[test]
fn incident_line_shows_bundle_state() {
    let mut snap = snapshot();
    snap.active_incident = Some(Incident::open(
        "abcd1234".to_string(),
        RiskLevel::Critical,
        "hang".to_string(),
        1_000,
    ));
    let text = render_status(&StatusReply {
        fresh: true,
        snapshot: snap,
    });
    assert!(text.contains("incident: abcd1234 (peak critical, bundle pending)"));
}

#[test]
fn budget_text_shows_reduction_and_leases() {
    let mut budget = Budget::default();
    budget.adjust_cap(RiskLevel::Warn, 1_000);
    budget
        .acquire(2, 60, "batch", &wd_core::SequentialIdGen::new("lease"), 1_000)
        .unwrap();
    budget.adjust_cap(RiskLevel::Ok, 3_000);

    let text = render_budget(&budget.summarize(4_000));
    assert!(text.contains("cap:      2 of base 4"));
    assert!(text.contains("slots:    2 in use, 0 available"));
    assert!(text.contains("reduced:  by warn risk"));
    assert!(text.contains("restore:  in 59s"));
    assert!(text.contains("lease:    lease-1 (2 slots) - batch"));
}

#[test]
fn plan_text_numbers_steps() {
    let plan = wd_engine::plan(&StateSnapshot::default());
    let text = render_plan(&plan);
    assert!(text.contains("status: Healthy"));
    assert!(text.contains("1. no action needed"));
}
