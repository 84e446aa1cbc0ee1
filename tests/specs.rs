// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios driving the full pipeline: probes → detector →
//! incident tracker → budget → attention → persisted state, plus the tool
//! surface over the same files.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wd_core::{
    AttentionLevel, FakeClock, Knobs, ProcessSample, RiskLevel, SequentialIdGen, UuidIdGen,
};
use wd_daemon::Supervisor;
use wd_engine::Tools;
use wd_probes::{FakeActivityProbe, FakeDiskProbe, FakeProcessProbe};
use wd_storage::{DataDir, Store};

struct World {
    _tmp: TempDir,
    supervisor: Supervisor<FakeClock, SequentialIdGen>,
    tools: Tools<FakeClock, SequentialIdGen>,
    clock: FakeClock,
    store: Store,
    processes: FakeProcessProbe,
    disk: FakeDiskProbe,
    activity: FakeActivityProbe,
}

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

fn world() -> World {
    let tmp = TempDir::new().unwrap();
    let tree = tmp.path().join("projects");
    std::fs::create_dir_all(&tree).unwrap();

    let store = Store::new(DataDir::at(tmp.path().join("data")));
    let clock = FakeClock::new();
    let processes = FakeProcessProbe::new();
    let disk = FakeDiskProbe::with_free_gb(100.0);
    let activity = FakeActivityProbe::new();

    let supervisor = Supervisor::new(
        store.clone(),
        tree.clone(),
        Knobs::default(),
        clock.clone(),
        SequentialIdGen::new("inc"),
        Arc::new(processes.clone()),
        Arc::new(disk.clone()),
        Arc::new(activity.clone()),
    );
    let tools = Tools::new(
        store.clone(),
        tree,
        Knobs::default(),
        clock.clone(),
        SequentialIdGen::new("lease"),
        Arc::new(processes.clone()),
        Arc::new(disk.clone()),
        Arc::new(activity.clone()),
    );

    World {
        _tmp: tmp,
        supervisor,
        tools,
        clock,
        store,
        processes,
        disk,
        activity,
    }
}

async fn ticks(world: &mut World, count: usize, seconds_apart: u64) {
    for _ in 0..count {
        world.clock.advance(Duration::from_secs(seconds_apart));
        world.supervisor.tick().await;
    }
}

// Scenario 1: cold start, healthy.
#[tokio::test]
async fn cold_start_healthy() {
    let mut w = world();
    w.processes.set_samples(vec![proc(100, 12.0, 300, 10)]);
    w.activity.set_mtime_seconds_ago(3);

    w.supervisor.tick().await;

    let state = w.store.load_state().unwrap().value;
    assert_eq!(state.hang_risk.level, RiskLevel::Ok);
    assert!(state.hang_risk.grace_remaining_seconds > 0);
    assert_eq!(state.attention.as_ref().unwrap().level, AttentionLevel::None);
    assert!(state.active_incident.is_none());
    assert_eq!(state.budget.as_ref().unwrap().current_cap, 4);
}

// Scenario 2: grace shields a quiet new process.
#[tokio::test]
async fn grace_shields_a_quiet_new_process() {
    let mut w = world();
    w.processes.set_samples(vec![proc(100, 0.0, 300, 15)]);
    w.activity.set_mtime_seconds_ago(900);

    w.supervisor.tick().await;
    ticks(&mut w, 1, 15).await;

    let state = w.store.load_state().unwrap().value;
    assert_eq!(state.hang_risk.level, RiskLevel::Ok);
    assert_eq!(state.hang_risk.grace_remaining_seconds, 45);
    assert_eq!(state.process_age_seconds, 15);
    assert!(state.composite_quiet_seconds >= 15);
}

// Scenario 3: composite quiet triggers warn.
#[tokio::test]
async fn composite_quiet_triggers_warn() {
    let mut w = world();
    w.processes.set_samples(vec![proc(100, 0.0, 300, 3600)]);
    w.activity.set_mtime_seconds_ago(305);

    w.supervisor.tick().await;
    ticks(&mut w, 1, 305).await;

    let state = w.store.load_state().unwrap().value;
    assert_eq!(state.hang_risk.level, RiskLevel::Warn);
    assert!(state
        .hang_risk
        .reasons
        .iter()
        .any(|r| r == "No activity for 305s"));

    let incident = state.active_incident.as_ref().unwrap();
    assert_eq!(incident.peak_level, RiskLevel::Warn);
    assert_eq!(state.budget.as_ref().unwrap().current_cap, 2);
}

// Scenario 4: escalation to critical, one bundle, close, cap restore.
#[tokio::test]
async fn escalation_capture_close_and_restore() {
    let mut w = world();
    w.processes.set_samples(vec![proc(100, 0.0, 300, 3600)]);
    w.activity.set_mtime_seconds_ago(2000);

    // Open at warn, then cross the critical boundary
    w.supervisor.tick().await;
    ticks(&mut w, 1, 400).await;
    let warn_state = w.store.load_state().unwrap().value;
    let incident_id = warn_state.active_incident.as_ref().unwrap().id.clone();
    assert_eq!(warn_state.hang_risk.level, RiskLevel::Warn);

    ticks(&mut w, 1, 505).await; // composite quiet now > 900
    let critical_state = w.store.load_state().unwrap().value;
    assert_eq!(critical_state.hang_risk.level, RiskLevel::Critical);
    let incident = critical_state.active_incident.as_ref().unwrap();
    assert_eq!(incident.id, incident_id, "same incident escalates");
    assert_eq!(incident.peak_level, RiskLevel::Critical);
    assert!(incident.bundle_captured);
    assert!(incident.bundle_path.as_ref().unwrap().exists());

    // Only one bundle, ever, for this incident
    ticks(&mut w, 3, 2).await;
    let bundles = std::fs::read_dir(w.store.dirs().root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("bundle-"))
        .count();
    assert_eq!(bundles, 1);

    // Activity resumes: quiet resets, incident closes
    w.activity.set_mtime_seconds_ago(1);
    w.processes.set_samples(vec![proc(100, 40.0, 300, 4000)]);
    ticks(&mut w, 1, 2).await;

    let ok_state = w.store.load_state().unwrap().value;
    assert_eq!(ok_state.hang_risk.level, RiskLevel::Ok);
    assert_eq!(ok_state.composite_quiet_seconds, 0);
    assert!(ok_state.active_incident.is_none());

    let incidents = w.store.incidents().read_all().unwrap();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].id, incident_id);
    assert!(incidents[0].closed_at_ms.is_some());

    // Cap holds at 1 until 60s of sustained ok, then restores to 4
    assert_eq!(ok_state.budget.as_ref().unwrap().current_cap, 1);
    ticks(&mut w, 29, 2).await;
    assert_eq!(
        w.store.load_state().unwrap().value.budget.unwrap().current_cap,
        1
    );
    ticks(&mut w, 2, 2).await;
    assert_eq!(
        w.store.load_state().unwrap().value.budget.unwrap().current_cap,
        4
    );
}

// Disk pressure warns immediately, even inside the grace window.
#[tokio::test]
async fn disk_pressure_bypasses_grace() {
    let mut w = world();
    w.processes.set_samples(vec![proc(100, 12.0, 300, 5)]);
    w.activity.set_mtime_seconds_ago(2);
    w.disk.set_free_gb(Some(3.5));

    w.supervisor.tick().await;

    let state = w.store.load_state().unwrap().value;
    assert!(state.hang_risk.grace_remaining_seconds > 0);
    assert_eq!(state.hang_risk.level, RiskLevel::Warn);
    assert!(state.hang_risk.disk_low);
    assert_eq!(state.attention.as_ref().unwrap().level, AttentionLevel::Warn);
    assert!(state.active_incident.is_some());
}

// Scenario 5: acquire / deny / release at the warn cap.
#[tokio::test]
async fn acquire_deny_release() {
    let mut w = world();
    w.processes.set_samples(vec![proc(100, 0.0, 300, 3600)]);
    w.activity.set_mtime_seconds_ago(600);
    w.supervisor.tick().await;
    ticks(&mut w, 1, 305).await; // warn → cap 2

    let granted = w
        .tools
        .budget_acquire(2, 60, "batch".to_string())
        .await
        .unwrap();
    assert!(granted.granted);
    assert_eq!(granted.summary.slots_in_use, 2);

    let denied = w
        .tools
        .budget_acquire(1, 60, "extra".to_string())
        .await
        .unwrap();
    assert!(!denied.granted);
    assert!(denied.denial.unwrap().contains("only 0 available"));

    let released = w
        .tools
        .budget_release(&granted.lease_id.unwrap())
        .await
        .unwrap();
    assert!(released.released);
    assert_eq!(released.summary.slots_in_use, 0);
    assert_eq!(released.summary.current_cap, 2, "cap waits for hysteresis");
}

// Scenario 6: corruption recovery.
#[tokio::test]
async fn budget_corruption_recovers_to_defaults() {
    let w = world();
    let budget_path = w.store.dirs().budget_path();
    std::fs::create_dir_all(budget_path.parent().unwrap()).unwrap();
    std::fs::write(&budget_path, "{malformed").unwrap();

    let summary = w.tools.budget_get().await.unwrap();
    assert_eq!(summary.current_cap, 4);
    assert!(summary.active_leases.is_empty());

    let backups = std::fs::read_dir(budget_path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("budget.json.corrupt.")
        })
        .count();
    assert_eq!(backups, 1);
}

// Write-then-read round trip for both records is byte-stable.
#[tokio::test]
async fn persisted_records_round_trip_byte_equivalent() {
    let mut w = world();
    w.processes.set_samples(vec![proc(100, 12.0, 300, 10)]);
    w.activity.set_mtime_seconds_ago(3);
    w.supervisor.tick().await;

    let state_bytes = std::fs::read(w.store.dirs().state_path()).unwrap();
    let state = w.store.load_state().unwrap().value;
    w.store.save_state(&state).unwrap();
    assert_eq!(std::fs::read(w.store.dirs().state_path()).unwrap(), state_bytes);

    let budget_bytes = std::fs::read(w.store.dirs().budget_path()).unwrap();
    let budget = w.store.load_budget().unwrap().value;
    w.store.save_budget(&budget).unwrap();
    assert_eq!(
        std::fs::read(w.store.dirs().budget_path()).unwrap(),
        budget_bytes
    );
}

// The production id generator mints 8-char opaque ids.
#[test]
fn production_ids_are_opaque_and_short() {
    use wd_core::IdGen;
    let id = UuidIdGen.next();
    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}
