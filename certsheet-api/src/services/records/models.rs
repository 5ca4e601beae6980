//! Location of the record table

use crate::sheet::{ColumnSpan, SheetRange};

/// The spreadsheet tab holding the records and the ranges used to read and write it
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub tab: String,
    /// A1 cells read for list and lookup, header row first (e.g. `A1:G`)
    pub data_range: String,
    /// Columns written by append and overwrite
    pub write_columns: ColumnSpan,
}

impl SheetTarget {
    pub fn data(&self) -> SheetRange {
        SheetRange::new(&self.spreadsheet_id, &self.tab, &self.data_range)
    }

    pub fn append_range(&self) -> SheetRange {
        SheetRange::new(&self.spreadsheet_id, &self.tab, self.write_columns.columns())
    }

    pub fn row_range(&self, row: crate::sheet::PhysicalRow) -> SheetRange {
        SheetRange::new(&self.spreadsheet_id, &self.tab, self.write_columns.row_cells(row))
    }
}
