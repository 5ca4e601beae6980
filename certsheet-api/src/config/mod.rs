//! Application configuration
//!
//! Built from layers, lowest precedence first: built-in defaults, an optional
//! TOML file, environment variables (a `.env` file is loaded beforehand) and
//! finally command-line flags applied by `main`.

mod env;
mod file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::api::resilience::{ResilienceConfig, TimeoutConfig, WriteConfig};
use crate::services::records::SheetTarget;
use crate::sheet::{CERTIFICATE_FIELDS, ColumnSpan, KeyMatch};

pub use file::PartialConfig;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_TAB: &str = "Users";
pub const DEFAULT_KEY_FILE: &str = "./test.json";
pub const DEFAULT_WRITE_RANGE: &str = "A:G";
pub const DEFAULT_ROUTE: &str = "/api/data";

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sheet: SheetConfig,
    pub routes: RouteConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub tab_name: String,
    /// Cells read for list and lookup, header row first
    pub data_range: String,
    pub write_columns: ColumnSpan,
    pub key_file: PathBuf,
    pub key_match: KeyMatch,
}

/// HTTP paths. `get`, `update` and `delete` are prefixes followed by the key.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    pub list: String,
    pub get: String,
    pub add: String,
    pub update: String,
    pub delete: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_concurrent_writes: usize,
}

impl AppConfig {
    /// Load configuration from an optional TOML file and the process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut partial = PartialConfig::default();
        if let Some(path) = file {
            partial = partial.merge(PartialConfig::from_file(path)?);
        }
        partial = partial.merge(PartialConfig::from_env(|name| std::env::var(name).ok())?);
        partial.resolve()
    }

    pub fn sheet_target(&self) -> SheetTarget {
        SheetTarget {
            spreadsheet_id: self.sheet.spreadsheet_id.clone(),
            tab: self.sheet.tab_name.clone(),
            data_range: self.sheet.data_range.clone(),
            write_columns: self.sheet.write_columns.clone(),
        }
    }

    pub fn resilience(&self) -> ResilienceConfig {
        ResilienceConfig {
            timeout: TimeoutConfig {
                request: self.client.request_timeout,
                connect: self.client.connect_timeout,
            },
            writes: WriteConfig {
                max_concurrent_writes: self.client.max_concurrent_writes,
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl RouteConfig {
    /// Path with the key parameter appended, e.g. `/api/data/{key}`
    pub fn keyed(prefix: &str) -> String {
        format!("{}{{key}}", prefix)
    }
}

/// Ensure a leading `/` and no trailing `/` (except for the root)
fn collection_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Ensure a leading and a trailing `/` so a key segment can follow
fn prefix_path(path: &str) -> String {
    let collection = collection_path(path);
    if collection.ends_with('/') {
        collection
    } else {
        format!("{}/", collection)
    }
}

impl PartialConfig {
    /// Apply defaults and validate
    pub fn resolve(self) -> Result<AppConfig> {
        let sheet = self.sheet.unwrap_or_default();
        let server = self.server.unwrap_or_default();
        let routes = self.routes.unwrap_or_default();
        let client = self.client.unwrap_or_default();

        let Some(spreadsheet_id) = sheet.spreadsheet_id.filter(|s| !s.trim().is_empty()) else {
            bail!("Spreadsheet id is not configured (set SHEET_ID or [sheet].spreadsheet_id)");
        };
        let Some(data_range) = sheet.data_range.filter(|s| !s.trim().is_empty()) else {
            bail!("Data range is not configured (set DATA_RANGE or [sheet].data_range)");
        };

        let write_range = sheet
            .write_range
            .unwrap_or_else(|| DEFAULT_WRITE_RANGE.to_string());
        let write_columns: ColumnSpan = write_range
            .parse()
            .with_context(|| format!("Invalid write range '{}'", write_range))?;
        if write_columns.width() as usize != CERTIFICATE_FIELDS.len() {
            bail!(
                "Write range '{}' spans {} columns, but rows have {} fields",
                write_range,
                write_columns.width(),
                CERTIFICATE_FIELDS.len()
            );
        }

        let request_timeout = client.request_timeout_secs.unwrap_or(30);
        if request_timeout == 0 {
            bail!("Request timeout must be at least one second");
        }

        Ok(AppConfig {
            server: ServerConfig {
                host: server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: server.port.unwrap_or(DEFAULT_PORT),
            },
            sheet: SheetConfig {
                spreadsheet_id: spreadsheet_id.trim().to_string(),
                tab_name: sheet.tab_name.unwrap_or_else(|| DEFAULT_TAB.to_string()),
                data_range: data_range.trim().to_string(),
                write_columns,
                key_file: sheet
                    .key_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_FILE)),
                key_match: sheet.key_match.unwrap_or_default(),
            },
            routes: RouteConfig {
                list: collection_path(routes.list.as_deref().unwrap_or(DEFAULT_ROUTE)),
                get: prefix_path(routes.get.as_deref().unwrap_or(DEFAULT_ROUTE)),
                add: collection_path(routes.add.as_deref().unwrap_or(DEFAULT_ROUTE)),
                update: prefix_path(routes.update.as_deref().unwrap_or(DEFAULT_ROUTE)),
                delete: prefix_path(routes.delete.as_deref().unwrap_or(DEFAULT_ROUTE)),
            },
            client: ClientConfig {
                request_timeout: Duration::from_secs(request_timeout),
                connect_timeout: Duration::from_secs(client.connect_timeout_secs.unwrap_or(10)),
                max_concurrent_writes: client.max_concurrent_writes.unwrap_or(1).max(1),
            },
        })
    }
}
