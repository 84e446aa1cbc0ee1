// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn config(dir: &TempDir) -> Config {
    let data_dir = DataDir::at(dir.path().join("data"));
    Config {
        log_path: data_dir.daemon_log_path(),
        lock_path: data_dir.lock_path(),
        data_dir,
        watch_tree: dir.path().join("projects"),
        knobs: Knobs::default(),
    }
}

#[test]
fn lock_writes_our_pid() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);

    let _lock = acquire_lock(&config).unwrap();
    assert_eq!(read_locked_pid(&config), Some(std::process::id()));
}

#[test]
fn second_lock_in_the_same_process_fails() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);

    let _held = acquire_lock(&config).unwrap();
    // fs2 locks are per-handle, so a second open-and-lock must fail
    let second = acquire_lock(&config);
    assert!(matches!(second, Err(LifecycleError::LockFailed(_))));
}

#[test]
fn lock_releases_on_drop() {
    let tmp = TempDir::new().unwrap();
    let config = config(&tmp);

    {
        let _lock = acquire_lock(&config).unwrap();
    }
    let again = acquire_lock(&config);
    assert!(again.is_ok());
}
