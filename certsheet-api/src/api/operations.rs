//! Row write operations against the remote sheet

use anyhow::Result;
use log::debug;

use super::backend::SheetsBackend;
use super::models::{DeleteDimensionRequest, Dimension, DimensionRange, Request};
use crate::sheet::{PhysicalRow, SheetRange};

/// A single mutation of the remote sheet
#[derive(Debug, Clone, PartialEq)]
pub enum RowOperation {
    /// Append a row after the last row of the range
    Append {
        range: SheetRange,
        values: Vec<String>,
    },
    /// Overwrite the cells of one row in place
    Overwrite {
        /// Range covering exactly the target row, e.g. `Users!A5:G5`
        range: SheetRange,
        values: Vec<String>,
    },
    /// Remove one row, shifting every following row up
    DeleteRow {
        spreadsheet_id: String,
        /// Numeric id of the tab, from spreadsheet metadata
        sheet_id: i64,
        row: PhysicalRow,
    },
}

impl RowOperation {
    /// Create a new Append operation
    pub fn append(range: SheetRange, values: Vec<String>) -> Self {
        Self::Append { range, values }
    }

    /// Create a new Overwrite operation
    pub fn overwrite(range: SheetRange, values: Vec<String>) -> Self {
        Self::Overwrite { range, values }
    }

    /// Create a new DeleteRow operation
    pub fn delete_row(spreadsheet_id: impl Into<String>, sheet_id: i64, row: PhysicalRow) -> Self {
        Self::DeleteRow {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_id,
            row,
        }
    }

    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Append { .. } => "append",
            Self::Overwrite { .. } => "overwrite",
            Self::DeleteRow { .. } => "delete_row",
        }
    }

    /// The structural request for a DeleteRow, covering `[row - 1, row)`
    pub fn structural_request(&self) -> Option<Request> {
        match self {
            Self::DeleteRow { sheet_id, row, .. } => {
                let (start_index, end_index) = row.dimension_span();
                Some(Request::DeleteDimension(DeleteDimensionRequest {
                    range: DimensionRange {
                        sheet_id: *sheet_id,
                        dimension: Dimension::Rows,
                        start_index,
                        end_index,
                    },
                }))
            }
            _ => None,
        }
    }

    /// Execute this operation against a backend
    pub async fn execute(&self, backend: &dyn SheetsBackend) -> Result<()> {
        debug!("Executing {} operation", self.operation_type());
        match self {
            Self::Append { range, values } => backend.append_values(range, vec![values.clone()]).await,
            Self::Overwrite { range, values } => {
                backend.update_values(range, vec![values.clone()]).await
            }
            Self::DeleteRow { spreadsheet_id, .. } => {
                let requests = self.structural_request().into_iter().collect();
                backend.batch_update(spreadsheet_id, requests).await
            }
        }
    }
}
