use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Serve intern certificate records stored in a Google Sheets tab over HTTP.
#[derive(Parser, Debug)]
#[command(name = "certsheet-api", version, about)]
pub struct Cli {
    /// TOML configuration file. Environment variables override its values.
    #[arg(long, value_name = "PATH", env = "CERTSHEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Flags take precedence over every other configuration layer
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
