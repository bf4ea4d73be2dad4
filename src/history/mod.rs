// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! File history selection and rendering
//!
//! Everything here is pure: the items come from an [`crate::scm::ScmClient`]
//! and are narrowed by a [`VersionFilter`] before being rendered as a
//! tab-separated table or JSON.

pub mod filter;
pub mod format;

pub use filter::{select, VersionFilter};
pub use format::{render, render_json, render_line, write_history, OutputFormat, HEADER};
