// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the probes

use thiserror::Error;

/// Errors that can occur while probing.
///
/// Probes are best-effort: callers usually log one line and carry on with
/// a degraded reading rather than failing the tick.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("probe failed: {0}")]
    Failed(String),
}
