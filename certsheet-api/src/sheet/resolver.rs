//! Business key to physical row resolution

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::range::PhysicalRow;

/// Comparison policy for matching a requested certificate number against
/// column A. Applied uniformly by get, update and delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyMatch {
    /// Trim both sides and compare case-insensitively
    #[default]
    CaseInsensitive,
    /// Byte-for-byte comparison
    Exact,
}

impl KeyMatch {
    /// Check whether a stored cell value matches the requested key
    pub fn matches(&self, cell: &str, key: &str) -> bool {
        match self {
            Self::Exact => cell == key,
            Self::CaseInsensitive => cell.trim().to_lowercase() == key.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for KeyMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaseInsensitive => write!(f, "case-insensitive"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for KeyMatch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "case-insensitive" | "case_insensitive" | "insensitive" => Ok(Self::CaseInsensitive),
            "exact" | "case-sensitive" | "case_sensitive" => Ok(Self::Exact),
            other => anyhow::bail!(
                "Unknown key match policy '{}' (expected 'case-insensitive' or 'exact')",
                other
            ),
        }
    }
}

/// Find the first data row whose first column matches `key`.
///
/// Row 0 is the header and is never matched. Returns the physical sheet row
/// (array index + 1), or `None` when there are no data rows or no match.
pub fn find_row_by_key(rows: &[Vec<String>], key: &str, policy: KeyMatch) -> Option<PhysicalRow> {
    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| {
            row.first()
                .is_some_and(|cell| policy.matches(cell, key))
        })
        .map(|(index, _)| PhysicalRow::from_index(index))
}
