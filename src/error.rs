// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for sscmhist
//!
//! Two domain failures exist: establishing the session and querying the
//! file history. Their display text is exactly what the tool prints before
//! exiting with a failure status.

use thiserror::Error;

/// Main error type for sscmhist operations
#[derive(Error, Debug)]
pub enum HistError {
    /// Session establishment failed (unreachable server, bad credentials, bad branch)
    #[error("sscm_connect failed: {0}")]
    Connect(String),

    /// History retrieval failed (missing path, unauthenticated session, client fault)
    #[error("sscm_file_history failed: {0}")]
    Query(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HistError {
    /// Whether this is one of the two failures reported on stdout.
    pub fn is_scm_failure(&self) -> bool {
        matches!(self, HistError::Connect(_) | HistError::Query(_))
    }
}

/// Result type alias for sscmhist operations
pub type Result<T> = std::result::Result<T, HistError>;
