// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The client contract for talking to a Surround SCM server.

use crate::error::Result;
use crate::scm::types::{ConnectParams, HistoryItem, HistoryQuery};

/// A blocking client for one SCM server connection.
///
/// Implementations hold at most one live connection. Callers should go
/// through [`crate::scm::Session`] rather than calling these directly so
/// that `disconnect` is guaranteed to run.
#[cfg_attr(test, mockall::automock)]
pub trait ScmClient {
    /// Connect and authenticate. Failures are `HistError::Connect`.
    ///
    /// The credentials are consumed; implementations must not expose them
    /// afterwards.
    fn connect(&mut self, params: ConnectParams) -> Result<()>;

    /// Every recorded action against `file_path` in `repo_path`, in server
    /// order. Failures are `HistError::Query`.
    fn file_history(
        &mut self,
        repo_path: &str,
        file_path: &str,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryItem>>;

    /// Release the connection. Must be a no-op when `connect` never
    /// succeeded and when called more than once.
    fn disconnect(&mut self);
}
