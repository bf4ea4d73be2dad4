// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! sscmhist - print the change history of one file from a Surround SCM server.
//!
//! Architecture:
//! - `scm`: client contract, scoped session, and the `sscm` command-line backend
//! - `history`: version filtering and table/JSON rendering
//! - `app`: the connect / query / print / disconnect run
//! - `cli`: positional argument parsing

pub mod app;
pub mod cli;
pub mod error;
pub mod history;
pub mod scm;

pub use error::{HistError, Result};
