// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Core types shared by the SCM client and the history pipeline.

use serde::Serialize;
use std::fmt;

/// Mainline and branch a session is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    mainline: String,
    branch: String,
}

impl BranchContext {
    pub fn new(mainline: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            mainline: mainline.into(),
            branch: branch.into(),
        }
    }

    pub fn mainline(&self) -> &str {
        &self.mainline
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }
}

/// Username and password for the SCM server.
///
/// The password can be handed to a client exactly once via
/// [`Credentials::into_parts`]; it never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Consume the credentials, yielding `(username, password)`.
    pub fn into_parts(self) -> (String, String) {
        (self.username, self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    pub context: BranchContext,
}

/// Which kinds of action a history query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSelection {
    All,
}

/// Fixed parameters of a history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub include_workflow_changes: bool,
    pub include_custom_field_changes: bool,
    pub actions: ActionSelection,
}

impl HistoryQuery {
    /// The only query this tool issues: every action, no workflow or
    /// custom-field change tracking.
    pub const ALL_ACTIONS: HistoryQuery = HistoryQuery {
        include_workflow_changes: false,
        include_custom_field_changes: false,
        actions: ActionSelection::All,
    };
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::ALL_ACTIONS
    }
}

/// One recorded action against a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub version: u32,
    /// Seconds since the Unix epoch.
    pub date: u64,
    /// Raw action code, see [`action_code`].
    pub action: i32,
    pub action_branch: String,
    pub action_version: u32,
    pub username: String,
}

/// Action code for anything not in the table.
pub const UNKNOWN_ACTION: i32 = 0;

/// Action names as printed by the sscm client, indexed by code - 1.
const ACTION_NAMES: &[&str] = &[
    "add",
    "add to repository",
    "add to branch",
    "add from branch",
    "attach to issue",
    "attach to test case",
    "attach to requirement",
    "attach to external",
    "break share",
    "checkin",
    "delete",
    "duplicate",
    "file destroyed",
    "file moved",
    "file renamed",
    "label",
    "moved",
    "promote",
    "promote from",
    "promote to",
    "rebase from",
    "rebase with merge",
    "remove",
    "renamed",
    "repo destroyed",
    "repo moved",
    "repo renamed",
    "restore",
    "share",
    "rollback file",
    "rollback rebase",
    "rollback promote",
];

/// Map an action name to its integer code (case-insensitive).
pub fn action_code(name: &str) -> i32 {
    let name = name.trim();
    ACTION_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .map(|idx| idx as i32 + 1)
        .unwrap_or(UNKNOWN_ACTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("alice"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_credentials_into_parts() {
        let (user, pass) = Credentials::new("alice", "hunter2").into_parts();
        assert_eq!(user, "alice");
        assert_eq!(pass, "hunter2");
    }

    #[test]
    fn test_history_query_is_fixed() {
        let query = HistoryQuery::default();
        assert!(!query.include_workflow_changes);
        assert!(!query.include_custom_field_changes);
        assert_eq!(query.actions, ActionSelection::All);
    }

    #[test]
    fn test_action_codes() {
        assert_eq!(action_code("add"), 1);
        assert_eq!(action_code("checkin"), 10);
        assert_eq!(action_code("CheckIn"), 10);
        assert_eq!(action_code(" label "), 16);
        assert_eq!(action_code("rollback promote"), 32);
        assert_eq!(action_code("teleport"), UNKNOWN_ACTION);
    }

    #[test]
    fn test_history_item_json_field_names() {
        let item = HistoryItem {
            version: 2,
            date: 1_383_069_840,
            action: 10,
            action_branch: "main".into(),
            action_version: 2,
            username: "bob".into(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["actionBranch"], "main");
        assert_eq!(json["actionVersion"], 2);
        assert_eq!(json["date"], 1_383_069_840u64);
    }
}
