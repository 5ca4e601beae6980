//! In-memory `SheetsBackend` for tests
//!
//! Holds a single tab and mimics the Sheets API closely enough for the record
//! service: trailing empty cells are dropped on read, appends land after the
//! last row, updates address one row by its A1 range and row deletion shifts
//! later rows up. Every call is recorded.

use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::backend::SheetsBackend;
use super::models::{Request, SheetProperties};
use crate::sheet::SheetRange;

/// A recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get { range: String },
    Append { range: String, rows: Vec<Vec<String>> },
    Update { range: String, rows: Vec<Vec<String>> },
    Tabs { spreadsheet_id: String },
    BatchUpdate { spreadsheet_id: String, requests: Vec<Request> },
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::Append { .. } | Call::Update { .. } | Call::BatchUpdate { .. }
        )
    }
}

#[derive(Debug)]
struct State {
    tab: String,
    sheet_id: i64,
    rows: Vec<Vec<String>>,
    calls: Vec<Call>,
    failure: Option<String>,
}

#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new(tab: &str, sheet_id: i64, rows: &[&[&str]]) -> Self {
        Self {
            state: Mutex::new(State {
                tab: tab.to_string(),
                sheet_id,
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|c| c.to_string()).collect())
                    .collect(),
                calls: Vec::new(),
                failure: None,
            }),
        }
    }

    /// Make every subsequent call fail with `message`
    pub fn fail_with(&self, message: &str) {
        self.state.lock().unwrap().failure = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().rows.clone()
    }

    fn record(&self, call: Call) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(message) = &state.failure {
            bail!("{}", message);
        }
        Ok(state)
    }
}

fn check_tab(state: &State, range: &SheetRange) -> Result<()> {
    if range.tab != state.tab {
        bail!("Unable to parse range: {}", range.a1());
    }
    Ok(())
}

/// Row number of a single-row A1 range such as `A5:G5`
fn single_row(cells: &str) -> Result<usize> {
    let start = cells.split(':').next().unwrap_or_default();
    let digits: String = start.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => bail!("Range {} does not address a row", cells),
    }
}

fn trim_trailing_empty(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(String::is_empty) {
        row.pop();
    }
    row
}

#[async_trait]
impl SheetsBackend for MemoryBackend {
    async fn get_values(&self, range: &SheetRange) -> Result<Vec<Vec<String>>> {
        let state = self.record(Call::Get { range: range.a1() })?;
        check_tab(&state, range)?;
        Ok(state.rows.iter().cloned().map(trim_trailing_empty).collect())
    }

    async fn append_values(&self, range: &SheetRange, rows: Vec<Vec<String>>) -> Result<()> {
        let mut state = self.record(Call::Append {
            range: range.a1(),
            rows: rows.clone(),
        })?;
        check_tab(&state, range)?;
        state.rows.extend(rows);
        Ok(())
    }

    async fn update_values(&self, range: &SheetRange, rows: Vec<Vec<String>>) -> Result<()> {
        let mut state = self.record(Call::Update {
            range: range.a1(),
            rows: rows.clone(),
        })?;
        check_tab(&state, range)?;
        let first = single_row(&range.cells)?;
        for (offset, row) in rows.into_iter().enumerate() {
            let index = first - 1 + offset;
            if state.rows.len() <= index {
                state.rows.resize(index + 1, Vec::new());
            }
            state.rows[index] = row;
        }
        Ok(())
    }

    async fn sheet_tabs(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        let state = self.record(Call::Tabs {
            spreadsheet_id: spreadsheet_id.to_string(),
        })?;
        Ok(vec![SheetProperties {
            sheet_id: state.sheet_id,
            title: state.tab.clone(),
        }])
    }

    async fn batch_update(&self, spreadsheet_id: &str, requests: Vec<Request>) -> Result<()> {
        let mut state = self.record(Call::BatchUpdate {
            spreadsheet_id: spreadsheet_id.to_string(),
            requests: requests.clone(),
        })?;
        for request in requests {
            let Request::DeleteDimension(delete) = request;
            if delete.range.sheet_id != state.sheet_id {
                bail!("No grid with id: {}", delete.range.sheet_id);
            }
            let start = delete.range.start_index as usize;
            let end = (delete.range.end_index as usize).min(state.rows.len());
            if start < end {
                state.rows.drain(start..end);
            }
        }
        Ok(())
    }
}
