//! Environment variable configuration layer

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::file::{PartialClient, PartialConfig, PartialRoutes, PartialServer, PartialSheet};
use crate::sheet::KeyMatch;

impl PartialConfig {
    /// Read configuration from environment variables through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = var("PORT")
            .map(|value| value.trim().parse::<u16>())
            .transpose()
            .context("PORT must be a port number")?;
        let request_timeout_secs = var("REQUEST_TIMEOUT_SECS")
            .map(|value| value.trim().parse::<u64>())
            .transpose()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
        let max_concurrent_writes = var("MAX_CONCURRENT_WRITES")
            .map(|value| value.trim().parse::<usize>())
            .transpose()
            .context("MAX_CONCURRENT_WRITES must be a positive number")?;
        let key_match = var("KEY_MATCH")
            .map(|value| value.parse::<KeyMatch>())
            .transpose()?;

        Ok(PartialConfig {
            server: Some(PartialServer {
                host: var("HOST"),
                port,
            }),
            sheet: Some(PartialSheet {
                spreadsheet_id: var("SHEET_ID"),
                tab_name: var("TAB_NAME"),
                data_range: var("DATA_RANGE"),
                write_range: var("WRITE_RANGE"),
                key_file: var("SERVICE_ACCOUNT_KEY_FILE").map(PathBuf::from),
                key_match,
            }),
            routes: Some(PartialRoutes {
                list: var("GET_ALL_DATA"),
                get: var("GET_SPECIFIC_DATA"),
                add: var("ADD_DATA"),
                update: var("UPDATE_DATA"),
                delete: var("DELETE_DATA"),
            }),
            client: Some(PartialClient {
                request_timeout_secs,
                connect_timeout_secs: None,
                max_concurrent_writes,
            }),
        })
    }
}
