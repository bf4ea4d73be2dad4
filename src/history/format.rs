// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Rendering of selected history items.
//!
//! The text format is one tab-separated row per item. A header row is only
//! emitted when every version is being listed, so a filtered query prints
//! bare rows that are easy to consume from scripts.

use clap::ValueEnum;
use std::io::Write;

use super::filter::{select, VersionFilter};
use crate::error::Result;
use crate::scm::HistoryItem;

/// Header row of the text table.
pub const HEADER: &str = "version\tdate\taction\tactionBranch\tactionVersion\tusername";

/// How history is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated table
    #[default]
    Text,
    /// JSON array of items
    Json,
}

/// One table row for `item`.
pub fn render_line(item: &HistoryItem) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        item.version,
        item.date,
        item.action,
        item.action_branch,
        item.action_version,
        item.username
    )
}

/// Table lines for the items matching `filter`, header first when unfiltered.
pub fn render(items: &[HistoryItem], filter: VersionFilter) -> Vec<String> {
    let selected = select(items, filter);
    let mut lines = Vec::with_capacity(selected.len() + 1);
    if filter.is_all() {
        lines.push(HEADER.to_string());
    }
    lines.extend(selected.into_iter().map(render_line));
    lines
}

/// Pretty-printed JSON array of the items matching `filter`.
pub fn render_json(items: &[HistoryItem], filter: VersionFilter) -> Result<String> {
    Ok(serde_json::to_string_pretty(&select(items, filter))?)
}

/// Write the selected history to `out`, returning the number of items written.
pub fn write_history<W: Write + ?Sized>(
    out: &mut W,
    items: &[HistoryItem],
    filter: VersionFilter,
    format: OutputFormat,
) -> Result<usize> {
    let count = select(items, filter).len();
    match format {
        OutputFormat::Text => {
            for line in render(items, filter) {
                writeln!(out, "{}", line)?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", render_json(items, filter)?)?;
        }
    }
    out.flush()?;
    Ok(count)
}
