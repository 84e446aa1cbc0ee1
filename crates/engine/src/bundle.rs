// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Evidence bundles: one zip with everything a bug report needs.
//!
//! Contents: a system-info summary, the current process samples, tails of
//! the most recent session logs, the remediation journal, and the full
//! state snapshot. Only sizes, names, and tail lines of logs are read -
//! never parsed or inspected.

use crate::error::EngineError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use sysinfo::System;
use wd_core::thresholds::TAIL_LINES;
use wd_core::{JournalEntry, StateSnapshot};
use wd_probes::recent_files;
use wd_storage::Store;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// How many recent log files get their tails included.
const LOG_TAIL_FILES: usize = 10;

/// Journal entries included at the end of the bundle.
const JOURNAL_TAIL: usize = 500;

/// What a capture produced.
#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub total_bytes: u64,
}

/// Write a bundle for the given snapshot.
///
/// The default location is `bundle-<timestamp>.zip` in the data dir;
/// `output_path` overrides it. The capture itself is journaled.
pub fn write_bundle(
    store: &Store,
    tree: &Path,
    snapshot: &StateSnapshot,
    now_ms: u64,
    output_path: Option<PathBuf>,
) -> Result<BundleSummary, EngineError> {
    let path = output_path.unwrap_or_else(|| store.dirs().bundle_path(now_ms));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(&path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = 0;

    zip.start_file("system.txt", options)?;
    zip.write_all(system_summary(snapshot, now_ms).as_bytes())?;
    entries += 1;

    zip.start_file("processes.json", options)?;
    zip.write_all(serde_json::to_string_pretty(&snapshot.processes)?.as_bytes())?;
    entries += 1;

    for (index, (log_path, _)) in recent_files(tree, LOG_TAIL_FILES).iter().enumerate() {
        let Some(tail) = read_tail(log_path) else {
            continue;
        };
        let name = log_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string());
        zip.start_file(format!("logs/{:02}-{}.tail.txt", index, name), options)?;
        zip.write_all(&tail)?;
        entries += 1;
    }

    let journal = store.journal().tail(JOURNAL_TAIL)?;
    zip.start_file("journal.jsonl", options)?;
    for entry in &journal {
        zip.write_all(serde_json::to_string(entry)?.as_bytes())?;
        zip.write_all(b"\n")?;
    }
    entries += 1;

    zip.start_file("state.json", options)?;
    zip.write_all(serde_json::to_string_pretty(snapshot)?.as_bytes())?;
    entries += 1;

    zip.finish()?;

    let total_bytes = std::fs::metadata(&path)?.len();
    store.journal_best_effort(
        &JournalEntry::new(now_ms, "bundle", format!("{} entries", entries))
            .with_target(path.display().to_string())
            .with_sizes(0, total_bytes),
    );

    Ok(BundleSummary {
        path,
        entries,
        total_bytes,
    })
}

/// Plain-text header: enough context to orient a bug report reader.
fn system_summary(snapshot: &StateSnapshot, now_ms: u64) -> String {
    let mut out = String::new();
    out.push_str(&format!("generated_at_ms: {}\n", now_ms));
    out.push_str(&format!(
        "host: {}\n",
        System::host_name().unwrap_or_else(|| "unknown".to_string())
    ));
    out.push_str(&format!(
        "os: {} {}\n",
        System::name().unwrap_or_else(|| "unknown".to_string()),
        System::os_version().unwrap_or_default()
    ));
    out.push_str(&format!("system_uptime_seconds: {}\n", System::uptime()));
    match snapshot.disk_free_gb {
        Some(gb) => out.push_str(&format!("disk_free_gb: {:.1}\n", gb)),
        None => out.push_str("disk_free_gb: unknown\n"),
    }
    out.push_str(&format!("log_tree_size_mb: {:.1}\n", snapshot.log_tree_size_mb));
    out.push_str(&format!("watched_processes: {}\n", snapshot.processes.len()));
    out.push_str(&format!("risk: {}\n", snapshot.hang_risk.level));
    out
}

/// Trailing lines of a log file; `None` for unreadable or gzipped files.
fn read_tail(path: &Path) -> Option<Vec<u8>> {
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        return None;
    }
    let content = std::fs::read(path).ok()?;
    let start = crate::logman::tail_offset(&content, TAIL_LINES);
    Some(content[start..].to_vec())
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
