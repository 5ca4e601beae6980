mod api;
mod cli;
mod config;
mod server;
mod services;
mod sheet;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;

use api::{AuthManager, SPREADSHEETS_SCOPE, SheetsClient, WriteLimiter};
use cli::Cli;
use config::AppConfig;
use server::AppState;
use services::records::RecordService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let resilience = config.resilience();
    let http = SheetsClient::http_client(&resilience)?;
    let auth = AuthManager::from_key_file(&config.sheet.key_file, SPREADSHEETS_SCOPE, http.clone())?;
    info!(
        "Using service account {} for spreadsheet {} (tab {})",
        auth.client_email(),
        config.sheet.spreadsheet_id,
        config.sheet.tab_name
    );

    let records = RecordService::new(
        Arc::new(SheetsClient::new(http, auth)),
        config.sheet_target(),
        config.sheet.key_match,
        WriteLimiter::new(resilience.writes),
    );
    let records = Arc::new(records);
    let app = server::router(
        AppState {
            records: records.clone(),
        },
        &config.routes,
    );

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    server::serve(listener, app).await?;

    let stats = records.write_stats();
    info!(
        "Stopped after {} writes ({:.0}% waited for a permit)",
        stats.writes_acquired,
        stats.wait_rate() * 100.0
    );
    Ok(())
}
