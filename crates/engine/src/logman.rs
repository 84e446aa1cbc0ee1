// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log-tree maintenance: scan, compress, trim, prune.
//!
//! Rotation is compression and trimming preserves tail lines - user
//! content is never simply deleted. The only deletions are stale session
//! artifacts matching the canonical uuid pattern, and the `memory` /
//! `sessions-index.json` names are never touched at all.

use crate::error::EngineError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;
use wd_core::thresholds::{
    MAX_FILE_SIZE_MB, PROTECTED_NAMES, RETAIN_DAYS, STALE_SESSION_DAYS, TAIL_LINES,
};
use wd_core::{Clock, JournalEntry, Knobs};
use wd_storage::Store;

/// Depth bound matching the activity probe's walk.
const WALK_DEPTH: usize = 3;

/// What a scan found, before any fixing.
#[derive(Debug, Clone, Default)]
pub struct LogScan {
    pub total_size_mb: f64,
    pub file_count: usize,
    /// Plain files above the size limit, candidates for tail-trimming.
    pub oversized: Vec<PathBuf>,
    /// Session logs past the retention window, candidates for gzip.
    pub compressible: Vec<PathBuf>,
    /// Session artifacts past the stale window, candidates for deletion.
    pub stale: Vec<PathBuf>,
}

impl LogScan {
    /// True when the tree needs attention under the given knobs.
    pub fn needs_fix(&self, knobs: &Knobs) -> bool {
        self.total_size_mb > knobs.max_log_dir_mb as f64
            || !self.oversized.is_empty()
            || !self.compressible.is_empty()
            || !self.stale.is_empty()
    }
}

/// Outcome of one fix pass.
#[derive(Debug, Clone, Default)]
pub struct FixReport {
    pub size_before_mb: f64,
    pub size_after_mb: f64,
    pub compressed: usize,
    pub trimmed: usize,
    pub deleted: usize,
}

/// The log-tree maintainer.
#[derive(Debug, Clone)]
pub struct LogManager {
    tree: PathBuf,
}

impl LogManager {
    pub fn new(tree: PathBuf) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &Path {
        &self.tree
    }

    /// Scan with the standard thresholds.
    pub fn scan(&self, now: SystemTime) -> Result<LogScan, EngineError> {
        self.scan_with(now, RETAIN_DAYS, MAX_FILE_SIZE_MB)
    }

    fn scan_with(
        &self,
        now: SystemTime,
        retain_days: u64,
        max_file_mb: u64,
    ) -> Result<LogScan, EngineError> {
        let mut scan = LogScan::default();
        if !self.tree.exists() {
            return Ok(scan);
        }

        let retain = Duration::from_secs(retain_days * 86_400);
        let stale = Duration::from_secs(STALE_SESSION_DAYS * 86_400);
        let max_bytes = max_file_mb * 1024 * 1024;

        let walker = WalkDir::new(&self.tree)
            .max_depth(WALK_DEPTH)
            .into_iter()
            .filter_entry(|e| !is_protected(e.path()));

        for entry in walker {
            let entry = entry.map_err(|e| EngineError::Scan(e.to_string()))?;
            let path = entry.path();
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            let age = meta
                .modified()
                .ok()
                .and_then(|m| now.duration_since(m).ok())
                .unwrap_or_default();

            if entry.file_type().is_dir() {
                if is_session_dir(path) && age >= stale {
                    scan.stale.push(path.to_path_buf());
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            scan.file_count += 1;
            scan.total_size_mb += meta.len() as f64 / (1024.0 * 1024.0);

            if is_session_artifact(path) && age >= stale {
                scan.stale.push(path.to_path_buf());
                continue;
            }
            if is_session_log(path) && age >= retain {
                scan.compressible.push(path.to_path_buf());
                continue;
            }
            if !is_gzipped(path) && meta.len() > max_bytes {
                scan.oversized.push(path.to_path_buf());
            }
        }

        Ok(scan)
    }

    /// Apply fixes: compress past-retention logs, trim oversized files to
    /// their tail, delete stale session artifacts. Aggressive mode halves
    /// the retention window and the tolerated file size.
    ///
    /// Every applied action is journaled. Individual file failures are
    /// logged and skipped; the pass keeps going.
    pub fn fix(
        &self,
        aggressive: bool,
        store: &Store,
        clock: &impl Clock,
    ) -> Result<FixReport, EngineError> {
        let divisor = if aggressive { 2 } else { 1 };
        let retain_days = RETAIN_DAYS / divisor;
        let max_file_mb = MAX_FILE_SIZE_MB / divisor;

        let now = SystemTime::now();
        let scan = self.scan_with(now, retain_days, max_file_mb)?;
        let mut report = FixReport {
            size_before_mb: scan.total_size_mb,
            ..Default::default()
        };

        for path in &scan.compressible {
            match compress_file(path) {
                Ok((before, after)) => {
                    report.compressed += 1;
                    store.journal_best_effort(
                        &JournalEntry::new(clock.epoch_ms(), "compress", "gzip past retention")
                            .with_target(path.display().to_string())
                            .with_sizes(before, after),
                    );
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "compress failed"),
            }
        }

        for path in &scan.oversized {
            // A file can leave the oversized set if it was also compressible
            if !path.exists() {
                continue;
            }
            match trim_file_to_tail(path, TAIL_LINES) {
                Ok((before, after)) => {
                    report.trimmed += 1;
                    store.journal_best_effort(
                        &JournalEntry::new(
                            clock.epoch_ms(),
                            "trim",
                            format!("kept trailing {} lines", TAIL_LINES),
                        )
                        .with_target(path.display().to_string())
                        .with_sizes(before, after),
                    );
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "trim failed"),
            }
        }

        for path in &scan.stale {
            let result = if path.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            match result {
                Ok(()) => {
                    report.deleted += 1;
                    store.journal_best_effort(
                        &JournalEntry::new(clock.epoch_ms(), "delete-stale", "stale session artifact")
                            .with_target(path.display().to_string()),
                    );
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "delete failed"),
            }
        }

        report.size_after_mb = self.scan_with(now, retain_days, max_file_mb)?.total_size_mb;
        Ok(report)
    }
}

/// True for names the log manager must never touch.
fn is_protected(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| PROTECTED_NAMES.contains(&name))
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// `<uuid>.jsonl` - an uncompressed session log.
fn is_session_log(path: &Path) -> bool {
    file_name(path)
        .and_then(|name| name.strip_suffix(".jsonl"))
        .is_some_and(is_canonical_uuid)
}

/// `<uuid>.jsonl` or `<uuid>.jsonl.gz` - any session artifact file.
fn is_session_artifact(path: &Path) -> bool {
    file_name(path)
        .and_then(|name| {
            name.strip_suffix(".jsonl.gz")
                .or_else(|| name.strip_suffix(".jsonl"))
        })
        .is_some_and(is_canonical_uuid)
}

/// `<uuid>` directory.
fn is_session_dir(path: &Path) -> bool {
    file_name(path).is_some_and(is_canonical_uuid)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Canonical 8-4-4-4-12 hex uuid.
fn is_canonical_uuid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 5
        && [8, 4, 4, 4, 12]
            .iter()
            .zip(&groups)
            .all(|(len, g)| g.len() == *len && g.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Gzip a file in place: write `<path>.gz`, then remove the original only
/// after the archive is fully flushed.
fn compress_file(path: &Path) -> Result<(u64, u64), io::Error> {
    let before = fs::metadata(path)?.len();
    let gz_path = path.with_extension(gz_extension(path));

    {
        let mut input = File::open(path)?;
        let output = File::create(&gz_path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
        io::copy(&mut input, &mut encoder)?;
        let writer = encoder.finish()?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    }

    fs::remove_file(path)?;
    let after = fs::metadata(&gz_path)?.len();
    Ok((before, after))
}

fn gz_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.gz", ext),
        None => "gz".to_string(),
    }
}

/// Rewrite a file keeping only its trailing `lines` lines, via a `.tmp`
/// sibling and rename so a crash never loses the tail.
fn trim_file_to_tail(path: &Path, lines: usize) -> Result<(u64, u64), io::Error> {
    let before = fs::metadata(path)?.len();

    let mut content = Vec::with_capacity(before as usize);
    File::open(path)?.read_to_end(&mut content)?;
    let tail_start = tail_offset(&content, lines);

    let tmp_path = path.with_extension("trim.tmp");
    {
        let mut out = File::create(&tmp_path)?;
        out.write_all(&content[tail_start..])?;
        out.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    let after = fs::metadata(path)?.len();
    Ok((before, after))
}

/// Byte offset where the trailing `lines` lines begin.
pub(crate) fn tail_offset(content: &[u8], lines: usize) -> usize {
    if lines == 0 {
        return content.len();
    }
    // Ignore a trailing newline so "last N lines" means N visible lines
    let end = if content.last() == Some(&b'\n') {
        content.len() - 1
    } else {
        content.len()
    };

    let mut seen = 0;
    for i in (0..end).rev() {
        if content[i] == b'\n' {
            seen += 1;
            if seen == lines {
                return i + 1;
            }
        }
    }
    0
}

#[cfg(test)]
#[path = "logman_tests.rs"]
mod tests;
