//! Google Sheets Web API Module
//!
//! Authenticated access to the Sheets v4 REST API, the backend trait the
//! record service is written against, and the row write operations it issues.

pub mod auth;
pub mod backend;
pub mod client;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod operations;
pub mod resilience;
#[cfg(test)]
pub mod stub_server;

pub use auth::{AuthManager, SPREADSHEETS_SCOPE};
pub use backend::SheetsBackend;
pub use client::SheetsClient;
pub use models::{Request, SheetProperties};
pub use operations::RowOperation;
pub use resilience::{ResilienceConfig, WriteConfig, WriteLimiter, WriteLimiterStats};
