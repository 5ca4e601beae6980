//! Record operations over the Sheets backend
//!
//! Every call re-reads the sheet; nothing is cached between requests.
//! Mutations hold a write permit across their resolve-then-write sequence.

use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use super::error::RecordError;
use super::models::SheetTarget;
use crate::api::{RowOperation, SheetsBackend, WriteLimiter, WriteLimiterStats};
use crate::sheet::{CertificateInput, KeyMatch, PhysicalRow, Record, find_row_by_key};
use crate::sheet::{record_from_row, rows_to_records};

pub struct RecordService {
    backend: Arc<dyn SheetsBackend>,
    target: SheetTarget,
    key_match: KeyMatch,
    writes: WriteLimiter,
}

impl RecordService {
    pub fn new(
        backend: Arc<dyn SheetsBackend>,
        target: SheetTarget,
        key_match: KeyMatch,
        writes: WriteLimiter,
    ) -> Self {
        Self {
            backend,
            target,
            key_match,
            writes,
        }
    }

    pub fn write_stats(&self) -> WriteLimiterStats {
        self.writes.stats()
    }

    /// All records in sheet order
    pub async fn list(&self) -> Result<Vec<Record>, RecordError> {
        let rows = self.read_rows().await?;
        Ok(rows_to_records(&rows))
    }

    /// The first record whose key column matches `key`
    pub async fn get(&self, key: &str) -> Result<Record, RecordError> {
        let rows = self.read_rows().await?;
        let row = find_row_by_key(&rows, key, self.key_match)
            .ok_or_else(|| RecordError::RecordNotFound(key.to_string()))?;

        let header = &rows[0];
        Ok(record_from_row(header, row_at(&rows, row)))
    }

    /// Append a new record. `CertNo` and `NAME` are required.
    pub async fn create(&self, input: &CertificateInput) -> Result<(), RecordError> {
        let missing = input.missing_required();
        let Some(key) = input.cert_no.as_deref().filter(|_| missing.is_empty()) else {
            warn!("Rejecting create: missing {}", missing.join(", "));
            return Err(RecordError::MissingFields(missing));
        };

        let _permit = self.writes.acquire().await?;
        RowOperation::append(self.target.append_range(), input.to_row(key))
            .execute(self.backend.as_ref())
            .await
            .context("Failed to append record")?;

        info!("Appended record {}", key);
        Ok(())
    }

    /// Overwrite the record matching `key`.
    ///
    /// The key column keeps the value already stored in the sheet; `CertNo`
    /// in the body is ignored and absent fields are cleared.
    pub async fn update(&self, key: &str, input: &CertificateInput) -> Result<(), RecordError> {
        let _permit = self.writes.acquire().await?;

        let rows = self.read_rows().await?;
        let Some(row) = find_row_by_key(&rows, key, self.key_match) else {
            warn!("Update target {} not found", key);
            return Err(RecordError::KeyNotFound(key.to_string()));
        };

        let stored_key = row_at(&rows, row).first().map_or(key, String::as_str);
        RowOperation::overwrite(self.target.row_range(row), input.to_row(stored_key))
            .execute(self.backend.as_ref())
            .await
            .with_context(|| format!("Failed to overwrite row {}", row))?;

        info!("Updated record {} at row {}", key, row);
        Ok(())
    }

    /// Remove the row holding the record matching `key`
    pub async fn delete(&self, key: &str) -> Result<(), RecordError> {
        let _permit = self.writes.acquire().await?;

        let tabs = self
            .backend
            .sheet_tabs(&self.target.spreadsheet_id)
            .await
            .context("Failed to read spreadsheet metadata")?;
        let Some(tab) = tabs.iter().find(|tab| tab.title == self.target.tab) else {
            warn!("Tab {} missing from spreadsheet metadata", self.target.tab);
            return Err(RecordError::TabNotFound(self.target.tab.clone()));
        };

        let rows = self.read_rows().await?;
        let Some(row) = find_row_by_key(&rows, key, self.key_match) else {
            warn!("Delete target {} not found", key);
            return Err(RecordError::KeyNotFound(key.to_string()));
        };

        RowOperation::delete_row(&self.target.spreadsheet_id, tab.sheet_id, row)
            .execute(self.backend.as_ref())
            .await
            .with_context(|| format!("Failed to delete row {}", row))?;

        info!("Deleted record {} at row {}", key, row);
        Ok(())
    }

    async fn read_rows(&self) -> Result<Vec<Vec<String>>, RecordError> {
        let range = self.target.data();
        let rows = self
            .backend
            .get_values(&range)
            .await
            .with_context(|| format!("Failed to read {}", range))?;
        Ok(rows)
    }
}

fn row_at(rows: &[Vec<String>], row: PhysicalRow) -> &[String] {
    &rows[row.get() as usize - 1]
}
