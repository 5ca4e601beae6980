//! Client resilience configuration
//!
//! Provides request timeouts and write serialization settings for the
//! Sheets client with sane defaults.

use std::time::Duration;

/// Resilience configuration for Sheets API calls
#[derive(Debug, Clone, PartialEq)]
pub struct ResilienceConfig {
    pub timeout: TimeoutConfig,
    pub writes: WriteConfig,
}

/// Per-request timeouts applied by the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutConfig {
    /// Upper bound for one complete request, including the body
    pub request: Duration,
    /// Upper bound for establishing the TCP/TLS connection
    pub connect: Duration,
}

/// Serialization of mutating operations inside this process
#[derive(Debug, Clone, PartialEq)]
pub struct WriteConfig {
    /// Mutations allowed to run their resolve-then-write sequence at once
    pub max_concurrent_writes: usize,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            connect: Duration::from_secs(10),
        }
    }
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            // One permit keeps row numbers stable between resolve and write
            max_concurrent_writes: 1,
        }
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            timeout: TimeoutConfig::default(),
            writes: WriteConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResilienceConfig::default();

        assert_eq!(config.timeout.request, Duration::from_secs(30));
        assert_eq!(config.timeout.connect, Duration::from_secs(10));
        assert_eq!(config.writes.max_concurrent_writes, 1);
    }
}
