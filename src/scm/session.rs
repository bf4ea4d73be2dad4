// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Scoped SCM session.
//!
//! A [`Session`] borrows the client for its whole lifetime and disconnects
//! it when dropped, whether or not the connection was ever established.

use tracing::{debug, warn};

use crate::error::{HistError, Result};
use crate::scm::client::ScmClient;
use crate::scm::types::{ConnectParams, HistoryItem, HistoryQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected yet (or the connect attempt failed)
    Init,
    Connected,
    Closed,
}

/// One connection to the SCM server, closed exactly once.
pub struct Session<'c, C: ScmClient + ?Sized> {
    client: &'c mut C,
    state: SessionState,
}

impl<'c, C: ScmClient + ?Sized> Session<'c, C> {
    /// Wrap `client` in an unconnected session.
    pub fn new(client: &'c mut C) -> Self {
        Self {
            client,
            state: SessionState::Init,
        }
    }

    /// Connect and authenticate against the server.
    pub fn open(&mut self, params: ConnectParams) -> Result<()> {
        if self.state != SessionState::Init {
            return Err(HistError::Connect(format!(
                "session is already {:?}",
                self.state
            )));
        }

        debug!(
            target: "sscmhist.session",
            host = %params.host,
            port = params.port,
            user = params.credentials.username(),
            mainline = params.context.mainline(),
            branch = params.context.branch(),
            "connecting"
        );

        match self.client.connect(params) {
            Ok(()) => {
                self.state = SessionState::Connected;
                Ok(())
            }
            Err(err) => {
                warn!(target: "sscmhist.session", error = %err, "connect failed");
                Err(err)
            }
        }
    }

    /// Run the history query for one file.
    pub fn fetch_history(&mut self, repo_path: &str, file_path: &str) -> Result<Vec<HistoryItem>> {
        if self.state != SessionState::Connected {
            return Err(HistError::Query("session is not connected".to_string()));
        }

        debug!(target: "sscmhist.session", repo_path, file_path, "querying file history");
        let items = self
            .client
            .file_history(repo_path, file_path, &HistoryQuery::ALL_ACTIONS)
            .inspect_err(
                |err| warn!(target: "sscmhist.session", error = %err, "history query failed"),
            )?;
        debug!(target: "sscmhist.session", count = items.len(), "history received");
        Ok(items)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Disconnect now instead of at drop. Later calls do nothing.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        debug!(target: "sscmhist.session", state = ?self.state, "disconnecting");
        self.client.disconnect();
        self.state = SessionState::Closed;
    }
}

impl<C: ScmClient + ?Sized> Drop for Session<'_, C> {
    fn drop(&mut self) {
        self.close();
    }
}
