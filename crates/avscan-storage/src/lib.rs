//! avscan Storage Library
//!
//! Optional persistence of scan results. Records are upserted into an
//! Elasticsearch index keyed by the scan identifier (SHA-256 of the sample
//! unless overridden), under `plugins.<category>.<name>`.

pub mod elasticsearch;
pub mod factory;
pub mod keys;
pub mod traits;

// Re-export commonly used types
pub use elasticsearch::ElasticsearchStore;
pub use factory::create_store;
pub use keys::scan_id;
pub use traits::{ResultStore, StorageError, StorageResult};
