// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic JSON records with corruption backup.
//!
//! Writes go to a `.tmp` sibling, fsync, then rename - a crash mid-write
//! leaves the previous record intact. Reads never fail on bad content: a
//! missing file yields the default, an unparseable file is copied aside to
//! `<name>.corrupt.<epoch>` and the default is returned so the next poll
//! repopulates it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur in record operations
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of loading a record, noting whether corruption was recovered.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    /// True when the on-disk file was unparseable and backed up.
    pub recovered_from_corruption: bool,
}

/// Save a record atomically (write to .tmp, fsync, then rename).
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), RecordError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load a record, falling back to the default on absence or corruption.
///
/// A corrupt file is copied to `<name>.corrupt.<epoch>` before the default
/// is returned; one warning line is logged.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<Loaded<T>, RecordError> {
    if !path.exists() {
        return Ok(Loaded {
            value: T::default(),
            recovered_from_corruption: false,
        });
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    match serde_json::from_reader(reader) {
        Ok(value) => Ok(Loaded {
            value,
            recovered_from_corruption: false,
        }),
        Err(e) => {
            let backup = corrupt_backup_path(path);
            warn!(
                error = %e,
                path = %path.display(),
                backup = %backup.display(),
                "Corrupt record, backing up and resetting to default",
            );
            fs::copy(path, &backup)?;
            Ok(Loaded {
                value: T::default(),
                recovered_from_corruption: true,
            })
        }
    }
}

/// `<name>.corrupt.<epoch>` sibling for an unparseable record.
fn corrupt_backup_path(path: &Path) -> std::path::PathBuf {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "record".to_string());
    path.with_file_name(format!("{}.corrupt.{}", name, epoch))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
