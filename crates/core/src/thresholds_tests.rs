// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn knobs_default_matches_documented_values() {
    let knobs = Knobs::default();
    assert_eq!(knobs.max_log_dir_mb, 200);
    assert_eq!(knobs.hang_no_activity_seconds, 300);
    assert!(!knobs.auto_fix);
    assert!(!knobs.auto_restart);
}

#[test]
fn caps_are_ordered() {
    assert!(CRITICAL_CAP < WARN_CAP);
    assert!(WARN_CAP < BASE_CAP);
}
