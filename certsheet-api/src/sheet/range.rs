//! A1 notation ranges and physical row numbers

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

/// A 1-based row position in the remote sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicalRow(u32);

impl PhysicalRow {
    /// Wrap a 1-based row number. Returns `None` for zero.
    #[cfg(test)]
    pub fn new(row: u32) -> Option<Self> {
        (row > 0).then_some(Self(row))
    }

    /// Convert a 0-based index into a fetched block into its sheet row
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX - 1) + 1)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Half-open 0-based dimension range `[row - 1, row)` covering exactly this row
    pub fn dimension_span(&self) -> (u32, u32) {
        (self.0 - 1, self.0)
    }
}

impl fmt::Display for PhysicalRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sheets grids end at column `ZZZ`
const MAX_COLUMN_LETTERS: usize = 3;

/// First and last column letters of a write range such as `A:G`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpan {
    pub first: String,
    pub last: String,
}

impl ColumnSpan {
    /// The A1 cells covering a single row of this span, e.g. `A5:G5`
    pub fn row_cells(&self, row: PhysicalRow) -> String {
        format!("{}{}:{}{}", self.first, row, self.last, row)
    }

    /// The A1 cells covering whole columns, e.g. `A:G`
    pub fn columns(&self) -> String {
        format!("{}:{}", self.first, self.last)
    }

    /// Number of columns covered by the span
    pub fn width(&self) -> u32 {
        column_number(&self.last).saturating_sub(column_number(&self.first)) + 1
    }
}

impl FromStr for ColumnSpan {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (first, last) = s
            .split_once(':')
            .with_context(|| format!("Column range '{}' must look like 'A:G'", s))?;

        let first = column_letters(first);
        let last = column_letters(last);
        if first.is_empty() || last.is_empty() {
            bail!("Column range '{}' must start each side with column letters", s);
        }
        if first.len() > MAX_COLUMN_LETTERS || last.len() > MAX_COLUMN_LETTERS {
            bail!("Column range '{}' goes past the last sheet column ZZZ", s);
        }
        if column_number(&first) > column_number(&last) {
            bail!("Column range '{}' ends before it starts", s);
        }

        Ok(Self { first, last })
    }
}

fn column_letters(cell: &str) -> String {
    cell.trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn column_number(letters: &str) -> u32 {
    letters
        .bytes()
        .fold(0, |acc, b| acc * 26 + u32::from(b - b'A' + 1))
}

/// A cell range inside one tab of one spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub spreadsheet_id: String,
    pub tab: String,
    pub cells: String,
}

impl SheetRange {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        tab: impl Into<String>,
        cells: impl Into<String>,
    ) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            tab: tab.into(),
            cells: cells.into(),
        }
    }

    /// The range in `Tab!A1:B2` notation, quoting the tab name when needed
    pub fn a1(&self) -> String {
        let plain = !self.tab.is_empty()
            && self
                .tab
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_');
        if plain {
            format!("{}!{}", self.tab, self.cells)
        } else {
            format!("'{}'!{}", self.tab.replace('\'', "''"), self.cells)
        }
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}
