// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn sample(pid: u32, cpu: f64) -> ProcessSample {
    ProcessSample {
        pid,
        name: "claude".to_string(),
        cpu_percent: cpu,
        memory_mb: 100,
        uptime_seconds: 60,
        handle_count: None,
    }
}

#[tokio::test]
async fn missing_tree_reads_as_unknown() {
    let dir = TempDir::new().unwrap();
    let probe = FsActivityProbe::new(dir.path().join("absent"));
    assert_eq!(probe.latest_mtime_seconds_ago().await, -1);
    assert_eq!(probe.tree_size_mb().await.unwrap(), 0.0);
}

#[tokio::test]
async fn fresh_write_reads_as_recent() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("project-a");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("session.jsonl"), "{}\n").unwrap();

    let probe = FsActivityProbe::new(dir.path().to_path_buf());
    let ago = probe.latest_mtime_seconds_ago().await;
    assert!((0..5).contains(&ago), "ago was {ago}");
}

#[test]
fn recent_files_ranks_by_mtime_not_listing_order() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("a-old.jsonl");
    let new = dir.path().join("z-new.jsonl");
    fs::write(&old, "old").unwrap();
    fs::write(&new, "new").unwrap();

    // Force distinct mtimes regardless of filesystem resolution
    let past = SystemTime::now() - Duration::from_secs(3600);
    let file = fs::File::options().write(true).open(&old).unwrap();
    file.set_modified(past).unwrap();

    let ranked = recent_files(dir.path(), 10);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].0, new);
    assert_eq!(ranked[1].0, old);

    let top1 = recent_files(dir.path(), 1);
    assert_eq!(top1.len(), 1);
    assert_eq!(top1[0].0, new);
}

#[test]
fn compose_marks_cpu_active_above_the_low_threshold() {
    let signals = compose_signals(3, &[sample(1, 4.9), sample(2, 5.1)]);
    assert!(signals.cpu_active);
    assert_eq!(signals.log_last_modified_seconds_ago, 3);
    assert_eq!(
        signals.sources,
        vec![ActivitySource::LogMtime, ActivitySource::Cpu]
    );

    // Exactly at the threshold is still low
    let quiet = compose_signals(-1, &[sample(1, 5.0)]);
    assert!(!quiet.cpu_active);
    assert_eq!(quiet.sources, vec![ActivitySource::Cpu]);
}

#[test]
fn log_quiet_honors_unknown_and_threshold() {
    let unknown = compose_signals(-1, &[]);
    assert!(unknown.log_quiet(300));

    let fresh = compose_signals(10, &[]);
    assert!(!fresh.log_quiet(300));

    // Exactly the threshold is not yet quiet (strict >)
    let at_threshold = compose_signals(300, &[]);
    assert!(!at_threshold.log_quiet(300));
    let past = compose_signals(301, &[]);
    assert!(past.log_quiet(300));
}
