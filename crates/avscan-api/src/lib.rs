//! avscan API Library
//!
//! HTTP upload endpoint: `POST /scan` stages the multipart `malware` field
//! in the staging directory, scans it and answers with the JSON report.

pub mod error;
mod handlers;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use setup::run;
