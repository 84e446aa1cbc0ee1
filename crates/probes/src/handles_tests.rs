// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn own_process_has_some_handles_on_supported_platforms() {
    let count = handle_count(std::process::id()).await;
    if cfg!(any(target_os = "linux", target_os = "macos")) {
        // Every process has at least stdin/stdout/stderr open
        assert!(count.is_some_and(|c| c >= 3), "count was {count:?}");
    } else {
        assert_eq!(count, None);
    }
}

#[tokio::test]
async fn unknown_pid_yields_none_not_an_error() {
    // Pid far outside any realistic range
    assert_eq!(handle_count(u32::MAX - 7).await, None);
}
