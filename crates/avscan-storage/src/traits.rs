//! Result store abstraction

use async_trait::async_trait;
use avscan_core::PluginResults;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage initialization failed: {0}")]
    InitFailed(String),

    #[error("Storage request failed: {0}")]
    RequestFailed(String),

    #[error("Storage backend returned {status}: {body}")]
    BackendError { status: u16, body: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence backend for plugin results.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Verify the backend is reachable and prepare it for writes.
    async fn init(&self) -> StorageResult<()>;

    /// Insert or update the results for `results.id`.
    async fn store(&self, results: &PluginResults) -> StorageResult<()>;
}
