// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Surround SCM client abstraction
//!
//! [`ScmClient`] is the contract the history pipeline depends on;
//! [`Session`] scopes one connection so that it is closed exactly once on
//! every exit path. [`sscm::SscmCommandClient`] implements the contract on
//! top of the `sscm` command-line client.

pub mod client;
pub mod session;
pub mod sscm;
pub mod types;

pub use client::ScmClient;
#[cfg(test)]
pub use client::MockScmClient;
pub use session::Session;
pub use sscm::SscmCommandClient;
pub use types::{
    action_code, ActionSelection, BranchContext, ConnectParams, Credentials, HistoryItem,
    HistoryQuery, UNKNOWN_ACTION,
};
