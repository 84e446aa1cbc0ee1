// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use wd_core::{Budget, RiskLevel, StateSnapshot};

fn store(dir: &TempDir) -> Store {
    Store::new(DataDir::at(dir.path().to_path_buf()))
}

#[test]
fn state_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let mut state = StateSnapshot::default();
    state.updated_at_ms = 123_456;
    state.daemon_running = true;
    store.save_state(&state).unwrap();

    let loaded = store.load_state().unwrap();
    assert!(!loaded.recovered_from_corruption);
    assert_eq!(loaded.value.updated_at_ms, 123_456);
    assert!(loaded.value.daemon_running);
}

#[test]
fn budget_corruption_resets_to_default_without_leases() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    // A budget with a reduced cap and one lease
    let mut budget = Budget::default();
    budget.adjust_cap(RiskLevel::Warn, 1_000);
    budget
        .acquire(1, 60, "work", &wd_core::SequentialIdGen::default(), 1_000)
        .unwrap();
    store.save_budget(&budget).unwrap();

    // Corrupt it in place
    std::fs::write(store.dirs().budget_path(), "{malformed").unwrap();

    let loaded = store.load_budget().unwrap();
    assert!(loaded.recovered_from_corruption);
    assert_eq!(loaded.value, Budget::default());
    assert!(loaded.value.leases.is_empty());
}

#[test]
fn incident_log_appends_closed_incidents() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let mut incident =
        wd_core::Incident::open("abcd1234".to_string(), RiskLevel::Warn, "quiet".to_string(), 10);
    incident.closed_at_ms = Some(99);
    store.incidents().append(&incident).unwrap();

    let all = store.incidents().read_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "abcd1234");
    assert_eq!(all[0].closed_at_ms, Some(99));
}
