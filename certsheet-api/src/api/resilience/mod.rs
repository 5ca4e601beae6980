//! Production resilience and hardening features
//!
//! Provides request timeouts and in-process write serialization for
//! Google Sheets API interactions.

pub mod concurrency;
pub mod config;

pub use concurrency::{WriteLimiter, WriteLimiterStats};
pub use config::{ResilienceConfig, TimeoutConfig, WriteConfig};
