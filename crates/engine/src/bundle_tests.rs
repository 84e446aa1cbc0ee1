// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use std::io::Read;
use tempfile::TempDir;
use wd_core::{HangRisk, ProcessSample, RiskLevel};
use wd_storage::DataDir;
use zip::ZipArchive;

fn snapshot() -> StateSnapshot {
    StateSnapshot {
        updated_at_ms: 1_000,
        daemon_running: true,
        processes: vec![ProcessSample {
            pid: 100,
            name: "claude".to_string(),
            cpu_percent: 12.0,
            memory_mb: 300,
            uptime_seconds: 10,
            handle_count: Some(42),
        }],
        hang_risk: HangRisk {
            level: RiskLevel::Critical,
            ..Default::default()
        },
        disk_free_gb: Some(100.0),
        ..Default::default()
    }
}

#[test]
fn bundle_contains_the_expected_entries() {
    let tmp = TempDir::new().unwrap();
    let tree = tmp.path().join("projects");
    fs::create_dir_all(&tree).unwrap();
    fs::write(tree.join("session.jsonl"), "one\ntwo\nthree\n").unwrap();

    let store = Store::new(DataDir::at(tmp.path().join("data")));
    store.journal_best_effort(&wd_core::JournalEntry::new(500, "compress", "earlier fix"));

    let summary = write_bundle(&store, &tree, &snapshot(), 777_000, None).unwrap();
    assert_eq!(summary.path, store.dirs().bundle_path(777_000));
    assert!(summary.total_bytes > 0);

    let mut archive = ZipArchive::new(fs::File::open(&summary.path).unwrap()).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"system.txt".to_string()));
    assert!(names.contains(&"processes.json".to_string()));
    assert!(names.contains(&"journal.jsonl".to_string()));
    assert!(names.contains(&"state.json".to_string()));
    assert!(names.iter().any(|n| n.starts_with("logs/") && n.ends_with("session.jsonl.tail.txt")));

    let mut system = String::new();
    archive
        .by_name("system.txt")
        .unwrap()
        .read_to_string(&mut system)
        .unwrap();
    assert!(system.contains("risk: critical"));
    assert!(system.contains("disk_free_gb: 100.0"));

    // The capture itself is journaled
    let journal = store.journal().read_all().unwrap();
    assert_eq!(journal.last().unwrap().action, "bundle");
}

#[test]
fn explicit_output_path_is_honored() {
    let tmp = TempDir::new().unwrap();
    let tree = tmp.path().join("projects");
    fs::create_dir_all(&tree).unwrap();
    let store = Store::new(DataDir::at(tmp.path().join("data")));

    let target = tmp.path().join("out").join("evidence.zip");
    let summary = write_bundle(&store, &tree, &snapshot(), 1_000, Some(target.clone())).unwrap();
    assert_eq!(summary.path, target);
    assert!(target.exists());
}

#[test]
fn gzipped_logs_are_skipped_in_tails() {
    let tmp = TempDir::new().unwrap();
    let tree = tmp.path().join("projects");
    fs::create_dir_all(&tree).unwrap();
    fs::write(tree.join("old.jsonl.gz"), [0x1f, 0x8b, 0x08]).unwrap();

    let store = Store::new(DataDir::at(tmp.path().join("data")));
    let summary = write_bundle(&store, &tree, &snapshot(), 2_000, None).unwrap();

    let mut archive = ZipArchive::new(fs::File::open(&summary.path).unwrap()).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(!names.iter().any(|n| n.starts_with("logs/")));
}
