// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-OS open-handle counting.
//!
//! Kept separate from the main process sample because it can be expensive
//! (macOS shells out to `lsof`) or unavailable. Failures and timeouts
//! yield `None` for that pid, never an error for the tick.

/// Count open handles for a pid, or `None` when unknowable.
pub async fn handle_count(pid: u32) -> Option<u32> {
    #[cfg(target_os = "linux")]
    {
        linux_fd_count(pid)
    }
    #[cfg(target_os = "macos")]
    {
        macos_lsof_count(pid).await
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = pid;
        None
    }
}

#[cfg(target_os = "linux")]
fn linux_fd_count(pid: u32) -> Option<u32> {
    let dir = format!("/proc/{}/fd", pid);
    let entries = std::fs::read_dir(dir).ok()?;
    Some(entries.filter_map(|e| e.ok()).count() as u32)
}

#[cfg(target_os = "macos")]
async fn macos_lsof_count(pid: u32) -> Option<u32> {
    use crate::subprocess::run_with_timeout;
    use wd_core::thresholds::HANDLE_COUNT_TIMEOUT;

    let mut cmd = tokio::process::Command::new("lsof");
    cmd.arg("-p").arg(pid.to_string()).kill_on_drop(true);

    let output = match run_with_timeout(cmd, HANDLE_COUNT_TIMEOUT, "lsof handle count").await {
        Ok(output) if output.status.success() => output,
        Ok(_) => return None,
        Err(e) => {
            tracing::debug!(pid, error = %e, "handle count probe failed");
            return None;
        }
    };

    // First line is the header
    let lines = output.stdout.split(|&b| b == b'\n').filter(|l| !l.is_empty());
    Some(lines.count().saturating_sub(1) as u32)
}

#[cfg(test)]
#[path = "handles_tests.rs"]
mod tests;
