//! The remote tabular store as seen by the record service

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Request, SheetProperties};
use crate::sheet::SheetRange;

/// Operations the record service needs from the spreadsheet provider.
///
/// Every call is a network round trip; implementations carry no cached state
/// about sheet contents between calls.
#[async_trait]
pub trait SheetsBackend: Send + Sync {
    /// Read a block of cells as rows of strings
    async fn get_values(&self, range: &SheetRange) -> Result<Vec<Vec<String>>>;

    /// Append rows after the last row of `range`
    async fn append_values(&self, range: &SheetRange, rows: Vec<Vec<String>>) -> Result<()>;

    /// Overwrite `range` in place
    async fn update_values(&self, range: &SheetRange, rows: Vec<Vec<String>>) -> Result<()>;

    /// List the tabs of a spreadsheet
    async fn sheet_tabs(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>>;

    /// Apply structural update requests
    async fn batch_update(&self, spreadsheet_id: &str, requests: Vec<Request>) -> Result<()>;
}
