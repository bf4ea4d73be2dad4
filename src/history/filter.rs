// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Version filtering over history items.

use std::fmt;

use crate::scm::HistoryItem;

/// Optional restriction to a single file version. Zero means "every version".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct VersionFilter(u32);

impl VersionFilter {
    /// No restriction.
    pub const ALL: VersionFilter = VersionFilter(0);

    pub fn new(version: u32) -> Self {
        Self(version)
    }

    /// Parse a command-line value; anything that is not a plain unsigned
    /// integer is treated as no filter.
    pub fn parse_lenient(raw: &str) -> Self {
        Self(raw.trim().parse().unwrap_or(0))
    }

    pub fn is_all(&self) -> bool {
        self.0 == 0
    }

    pub fn matches(&self, item: &HistoryItem) -> bool {
        self.is_all() || item.version == self.0
    }
}

impl fmt::Display for VersionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            write!(f, "all versions")
        } else {
            write!(f, "version {}", self.0)
        }
    }
}

/// Items matching `filter`, in their original order.
pub fn select(items: &[HistoryItem], filter: VersionFilter) -> Vec<&HistoryItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}
