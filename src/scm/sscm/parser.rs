// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Parser for `sscm history` output.
//!
//! A history line looks like one of
//!
//! ```text
//! checkin                      alice        3  10/29/2013 2:04 PM
//! add to branch [dev v. 2]     bob          4  10/30/2013 9:15 AM
//! renamed from [a.c] to [b.c]  carol        5  11/01/2013 11:40 AM
//! ```
//!
//! followed by optional indented comment lines, which are skipped. Entries
//! too wide for the terminal are wrapped onto the following line.

use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{HistError, Result};
use crate::scm::types::{action_code, HistoryItem, UNKNOWN_ACTION};

/// Lines of preamble printed before the first history entry.
pub const HEADER_LINES: usize = 4;

/// Most physical lines one wrapped entry is joined from.
const MAX_WRAPPED_LINES: usize = 3;

/// Format of the date column, in the server's local time zone.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M %p";

fn tail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<head>\S.*?)\s+(?P<version>\d+)\s+(?P<timestamp>\d{1,2}/\d{1,2}/\d{4}\s+\d{1,2}:\d{2}\s*[AaPp][Mm])\s*$",
        )
        .expect("history tail regex is valid")
    })
}

fn bracketed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<action>[^\[\]]+?)\s*\[(?P<data>[^\[\]]*?)(?: v\. (?P<data_version>\d+))?\]\s+(?P<author>\S.*)$",
        )
        .expect("bracketed history regex is valid")
    })
}

fn rename_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<action>[^\[\]]+?)\s+from \[(?P<from>[^\[\]]*)\] to \[(?P<to>[^\[\]]*)\]\s+(?P<author>\S.*)$",
        )
        .expect("rename history regex is valid")
    })
}

/// The action/author part of a history line.
#[derive(Debug, PartialEq, Eq)]
struct Head<'a> {
    action: &'a str,
    author: &'a str,
    /// Branch and version from a `[branch v. N]` annotation.
    origin: Option<(&'a str, u32)>,
}

/// Parse full `sscm history` output for a file queried on `branch`.
///
/// `sscm` wraps long entries over several lines, so a line that does not
/// parse on its own is kept and retried joined with the lines after it.
pub fn parse_history(output: &str, branch: &str) -> Result<Vec<HistoryItem>> {
    let mut items = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for line in output.lines().skip(HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let item = match parse_line(line, branch)? {
            Some(item) => Some(item),
            None => parse_wrapped(&pending, line, branch)?,
        };
        match item {
            Some(item) => {
                items.push(item);
                pending.clear();
            }
            None => {
                if pending.len() + 1 >= MAX_WRAPPED_LINES {
                    pending.remove(0);
                }
                pending.push(line);
            }
        }
    }
    Ok(items)
}

/// Retry `line` joined with the nearest unparsed lines before it.
///
/// Shorter joins are tried first so a comment above a wrapped entry is not
/// pulled into it. A join only starts on an unindented line, as comments are
/// indented.
fn parse_wrapped(pending: &[&str], line: &str, branch: &str) -> Result<Option<HistoryItem>> {
    for taken in 1..=pending.len() {
        let start = pending.len() - taken;
        if pending[start].starts_with(char::is_whitespace) {
            continue;
        }
        let joined = pending[start..]
            .iter()
            .chain(std::iter::once(&line))
            .map(|part| part.trim())
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(item) = parse_line(&joined, branch)? {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

/// Parse one line; `None` for comment and blank lines.
pub fn parse_line(line: &str, branch: &str) -> Result<Option<HistoryItem>> {
    let line = line.trim_end();
    let Some(caps) = tail_regex().captures(line) else {
        return Ok(None);
    };

    let Some(head) = split_head(&caps["head"]) else {
        return Ok(None);
    };

    let version: u32 = caps["version"]
        .parse()
        .map_err(|_| HistError::Query(format!("version out of range in '{}'", line)))?;
    let date = parse_timestamp(&caps["timestamp"])?;
    let (action_branch, action_version) = head.origin.unwrap_or((branch, version));

    Ok(Some(HistoryItem {
        version,
        date,
        action: action_code(head.action),
        action_branch: action_branch.to_string(),
        action_version,
        username: head.author.to_string(),
    }))
}

fn split_head(head: &str) -> Option<Head<'_>> {
    if let Some(caps) = rename_regex().captures(head) {
        return Some(Head {
            action: caps.name("action")?.as_str().trim(),
            author: caps.name("author")?.as_str().trim(),
            origin: None,
        });
    }

    if let Some(caps) = bracketed_regex().captures(head) {
        let origin = match caps.name("data_version") {
            Some(v) => Some((caps.name("data")?.as_str().trim(), v.as_str().parse().ok()?)),
            None => None,
        };
        return Some(Head {
            action: caps.name("action")?.as_str().trim(),
            author: caps.name("author")?.as_str().trim(),
            origin,
        });
    }

    if head.contains(['[', ']']) {
        return None;
    }
    split_plain_head(head)
}

/// Split `"<action> <author>"` where both sides may contain spaces.
///
/// Known action names win, longest first; otherwise the widest whitespace
/// gap separates the columns.
fn split_plain_head(head: &str) -> Option<Head<'_>> {
    let known = known_action_prefix(head);
    let (action, author) = match known {
        Some(len) => (&head[..len], &head[len..]),
        None => {
            let (start, end) = widest_gap(head)?;
            (&head[..start], &head[end..])
        }
    };

    let author = author.trim();
    if action.is_empty() || author.is_empty() {
        return None;
    }
    Some(Head {
        action: action.trim(),
        author,
        origin: None,
    })
}

fn known_action_prefix(head: &str) -> Option<usize> {
    let lower = head.to_ascii_lowercase();
    let mut best: Option<usize> = None;
    for (idx, _) in lower.match_indices(char::is_whitespace) {
        if action_code(&lower[..idx]) != UNKNOWN_ACTION {
            best = Some(idx);
        }
    }
    best
}

/// Byte range of the first longest run of whitespace.
fn widest_gap(text: &str) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut run_start: Option<usize> = None;

    for (idx, ch) in text.char_indices().chain(std::iter::once((text.len(), 'x'))) {
        match (ch.is_whitespace(), run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                if best.map_or(true, |(s, e)| idx - start > e - s) {
                    best = Some((start, idx));
                }
                run_start = None;
            }
            _ => {}
        }
    }
    best
}

/// Collapse whitespace and separate the AM/PM marker: "2:04PM" and
/// "2:04  pm" both become "2:04 PM".
fn normalize_timestamp(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let upper = collapsed.to_ascii_uppercase();
    let clock = upper
        .strip_suffix("AM")
        .or_else(|| upper.strip_suffix("PM"))?;
    let meridiem = &upper[clock.len()..];
    Some(format!("{} {}", clock.trim_end(), meridiem))
}

/// Seconds since the epoch for a `sscm` date column.
pub fn parse_timestamp(raw: &str) -> Result<u64> {
    let normalized = normalize_timestamp(raw)
        .ok_or_else(|| HistError::Query(format!("invalid timestamp '{}'", raw)))?;
    let naive = NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT)
        .map_err(|e| HistError::Query(format!("invalid timestamp '{}': {}", raw, e)))?;

    let seconds = match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.timestamp(),
        None => Utc.from_utc_datetime(&naive).timestamp(),
    };

    u64::try_from(seconds)
        .map_err(|_| HistError::Query(format!("timestamp before 1970: '{}'", raw)))
}
