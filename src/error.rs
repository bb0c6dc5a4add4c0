//! Error handling for the deimos sweeper
//!
//! Probe failures (timeout, non-zero ping exit, send failure) are never
//! errors; they fold into a [`crate::ProbeOutcome`]. Errors here cover
//! configuration and socket setup, the things a probe cannot recover from.

use thiserror::Error;

/// Main error type for sweep operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Permission denied: {0}")]
    PermissionError(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout error")]
    TimeoutError,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for sweep operations
pub type ScanResult<T> = Result<T, ScanError>;

impl From<std::net::AddrParseError> for ScanError {
    fn from(e: std::net::AddrParseError) -> Self {
        ScanError::InvalidTarget(e.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for ScanError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        ScanError::TimeoutError
    }
}
