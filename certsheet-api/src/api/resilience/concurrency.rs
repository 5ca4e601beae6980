//! Write limiter implementation
//!
//! Provides a semaphore-based limiter that serializes mutating record
//! operations, so the row number one request resolves is not shifted by
//! another request's delete before it writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use log::debug;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::config::WriteConfig;

/// Upper bound on configured permits (Tokio's max is 2^61-1)
const MAX_PERMITS: usize = 1_000_000;

/// Semaphore-based limiter for mutating operations
#[derive(Debug, Clone)]
pub struct WriteLimiter {
    semaphore: Arc<Semaphore>,
    writes_acquired: Arc<AtomicU64>,
    writes_waited: Arc<AtomicU64>,
}

impl WriteLimiter {
    /// Create a new write limiter with the given configuration
    pub fn new(config: WriteConfig) -> Self {
        let permits = config.max_concurrent_writes.clamp(1, MAX_PERMITS);

        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            writes_acquired: Arc::new(AtomicU64::new(0)),
            writes_waited: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Acquire a permit for a mutation. Waits if at capacity.
    /// The permit is released when dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        if self.semaphore.available_permits() == 0 {
            self.writes_waited.fetch_add(1, Ordering::Relaxed);
            debug!("Write limiter: waiting for permit");
        }

        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Write limiter semaphore closed")?;
        self.writes_acquired.fetch_add(1, Ordering::Relaxed);

        debug!(
            "Write limiter: acquired permit ({} available)",
            self.semaphore.available_permits()
        );

        Ok(permit)
    }

    /// Try to acquire a permit without waiting.
    /// Returns None if no permits are available.
    #[cfg(test)]
    pub fn try_acquire(&self) -> Option<OwnedSemaphorePermit> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        self.writes_acquired.fetch_add(1, Ordering::Relaxed);
        Some(permit)
    }

    /// Get current statistics
    pub fn stats(&self) -> WriteLimiterStats {
        WriteLimiterStats {
            writes_acquired: self.writes_acquired.load(Ordering::Relaxed),
            writes_waited: self.writes_waited.load(Ordering::Relaxed),
        }
    }
}

/// Statistics for the write limiter
#[derive(Debug, Clone)]
pub struct WriteLimiterStats {
    /// Total permits acquired since creation
    pub writes_acquired: u64,
    /// Number of times a mutation had to wait for a permit
    pub writes_waited: u64,
}

impl WriteLimiterStats {
    /// Fraction of mutations that had to wait
    pub fn wait_rate(&self) -> f64 {
        if self.writes_acquired == 0 {
            0.0
        } else {
            self.writes_waited as f64 / self.writes_acquired as f64
        }
    }
}
