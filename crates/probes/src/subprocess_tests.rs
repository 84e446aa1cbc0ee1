// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn command_completes_within_timeout() {
    let mut cmd = Command::new("true");
    cmd.kill_on_drop(true);
    let output = run_with_timeout(cmd, Duration::from_secs(5), "true").await;
    assert!(output.is_ok());
}

#[tokio::test]
async fn slow_command_reports_timeout() {
    let mut cmd = Command::new("sleep");
    cmd.arg("5").kill_on_drop(true);
    let err = run_with_timeout(cmd, Duration::from_millis(50), "sleep probe")
        .await
        .unwrap_err();
    assert!(err.contains("timed out"), "unexpected error: {err}");
}

#[tokio::test]
async fn missing_binary_reports_failure() {
    let cmd = Command::new("wd-no-such-binary-anywhere");
    let err = run_with_timeout(cmd, Duration::from_secs(1), "missing probe")
        .await
        .unwrap_err();
    assert!(err.contains("failed"), "unexpected error: {err}");
}
