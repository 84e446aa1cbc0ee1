// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use thiserror::Error;

/// Errors that can occur in the engine's collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record error: {0}")]
    Record(#[from] wd_storage::RecordError),
    #[error("journal error: {0}")]
    Journal(#[from] wd_storage::JournalError),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("probe error: {0}")]
    Probe(#[from] wd_probes::ProbeError),
    #[error("scan error: {0}")]
    Scan(String),
}
