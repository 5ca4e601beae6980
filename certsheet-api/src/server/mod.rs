//! HTTP surface
//!
//! Five record endpoints on configurable paths, with permissive CORS and
//! per-request logging.

mod body;
mod error;
mod handlers;
mod logging;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{delete, get, post, put};
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::RouteConfig;

pub use handlers::AppState;

/// Build the application router
pub fn router(state: AppState, routes: &RouteConfig) -> Router {
    Router::new()
        .route(&routes.list, get(handlers::list_records))
        .route(&RouteConfig::keyed(&routes.get), get(handlers::get_record))
        .route(&routes.add, post(handlers::create_record))
        .route(&RouteConfig::keyed(&routes.update), put(handlers::update_record))
        .route(&RouteConfig::keyed(&routes.delete), delete(handlers::delete_record))
        .layer(axum::middleware::from_fn(logging::log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!("Server listening at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
