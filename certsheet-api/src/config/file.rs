//! TOML configuration layer

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::sheet::KeyMatch;

/// Configuration with every value optional, as read from one source
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub server: Option<PartialServer>,
    pub sheet: Option<PartialSheet>,
    pub routes: Option<PartialRoutes>,
    pub client: Option<PartialClient>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialServer {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSheet {
    pub spreadsheet_id: Option<String>,
    pub tab_name: Option<String>,
    pub data_range: Option<String>,
    pub write_range: Option<String>,
    pub key_file: Option<PathBuf>,
    pub key_match: Option<KeyMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialRoutes {
    pub list: Option<String>,
    pub get: Option<String>,
    pub add: Option<String>,
    pub update: Option<String>,
    pub delete: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialClient {
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub max_concurrent_writes: Option<usize>,
}

/// Take `other` where it is set, else keep `base`
fn pick<T>(base: Option<T>, other: Option<T>) -> Option<T> {
    other.or(base)
}

fn merge_section<T>(
    base: Option<T>,
    other: Option<T>,
    merge: impl FnOnce(T, T) -> T,
) -> Option<T> {
    match (base, other) {
        (Some(base), Some(other)) => Some(merge(base, other)),
        (base, other) => other.or(base),
    }
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay `other` on top of `self`
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            server: merge_section(self.server, other.server, |a, b| PartialServer {
                host: pick(a.host, b.host),
                port: pick(a.port, b.port),
            }),
            sheet: merge_section(self.sheet, other.sheet, |a, b| PartialSheet {
                spreadsheet_id: pick(a.spreadsheet_id, b.spreadsheet_id),
                tab_name: pick(a.tab_name, b.tab_name),
                data_range: pick(a.data_range, b.data_range),
                write_range: pick(a.write_range, b.write_range),
                key_file: pick(a.key_file, b.key_file),
                key_match: pick(a.key_match, b.key_match),
            }),
            routes: merge_section(self.routes, other.routes, |a, b| PartialRoutes {
                list: pick(a.list, b.list),
                get: pick(a.get, b.get),
                add: pick(a.add, b.add),
                update: pick(a.update, b.update),
                delete: pick(a.delete, b.delete),
            }),
            client: merge_section(self.client, other.client, |a, b| PartialClient {
                request_timeout_secs: pick(a.request_timeout_secs, b.request_timeout_secs),
                connect_timeout_secs: pick(a.connect_timeout_secs, b.connect_timeout_secs),
                max_concurrent_writes: pick(a.max_concurrent_writes, b.max_concurrent_writes),
            }),
        }
    }
}
