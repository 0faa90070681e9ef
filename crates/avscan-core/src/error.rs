//! Error types module
//!
//! All scan-pipeline failures are unified under [`ScanError`]. Process-level
//! variants are absorbed by the invoker's retry policy and end up as the
//! `error` field of a [`crate::ScanRecord`]; storage and delivery variants are
//! reported to the operator and never alter the scan result.
//!
//! Parse anomalies are not represented here: the parsers are total and only
//! emit a warning log line.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like bad uploads
    Debug,
    /// Warning level - for recoverable issues like failed deliveries
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "SCAN_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("context deadline exceeded after {0} seconds")]
    ProcessTimeout(u64),

    #[error("exit status {0}")]
    ProcessNonZeroExit(i32),

    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{0}")]
    ScanFailed(String),

    #[error("failed to initialize storage: {0}")]
    StorageInitFailed(String),

    #[error("webhook delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ErrorMetadata for ScanError {
    fn http_status_code(&self) -> u16 {
        match self {
            ScanError::BadRequest(_) => 400,
            ScanError::ProcessTimeout(_) => 504,
            ScanError::StorageInitFailed(_) | ScanError::DeliveryFailed(_) => 502,
            _ => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ScanError::ProcessTimeout(_) => "PROCESS_TIMEOUT",
            ScanError::ProcessNonZeroExit(_) => "PROCESS_NON_ZERO_EXIT",
            ScanError::Spawn { .. } => "PROCESS_SPAWN_FAILED",
            ScanError::ScanFailed(_) => "SCAN_FAILED",
            ScanError::StorageInitFailed(_) => "STORAGE_INIT_FAILED",
            ScanError::DeliveryFailed(_) => "DELIVERY_FAILED",
            ScanError::BadRequest(_) => "BAD_REQUEST",
            ScanError::Io(_) => "IO_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScanError::ProcessTimeout(_)
                | ScanError::ProcessNonZeroExit(_)
                | ScanError::DeliveryFailed(_)
        )
    }

    fn client_message(&self) -> String {
        match self {
            // Filesystem details stay in the logs
            ScanError::Io(_) => "Failed to stage the uploaded file".to_string(),
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ScanError::BadRequest(_) => LogLevel::Debug,
            ScanError::DeliveryFailed(_) | ScanError::ProcessNonZeroExit(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_zero_exit_message_matches_scanner_status() {
        assert_eq!(ScanError::ProcessNonZeroExit(2).to_string(), "exit status 2");
    }

    #[test]
    fn test_metadata() {
        let err = ScanError::BadRequest("no file".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "BAD_REQUEST");
        assert_eq!(err.log_level(), LogLevel::Debug);

        let io = ScanError::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(io.http_status_code(), 500);
        assert!(!io.client_message().contains("disk full"));

        let storage = ScanError::StorageInitFailed("connection refused".to_string());
        assert_eq!(storage.http_status_code(), 502);
        assert_eq!(storage.error_code(), "STORAGE_INIT_FAILED");
    }
}
