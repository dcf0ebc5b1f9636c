//! Error types shared across the monitor crates.

use thiserror::Error;

/// Errors raised outside the scan path (settings, startup).
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
