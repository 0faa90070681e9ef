//! Application state shared by the request handlers.

use avscan_core::Config;
use avscan_services::ScanOrchestrator;
use std::path::PathBuf;

/// Read-only per-process state; every request works on its own staged file.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ScanOrchestrator,
    /// Directory receiving the `web_*` staged uploads
    pub staging_dir: PathBuf,
}

impl AppState {
    pub fn new(orchestrator: ScanOrchestrator, staging_dir: PathBuf) -> Self {
        Self {
            orchestrator,
            staging_dir,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ScanOrchestrator::from_config(config),
            config.staging_dir.clone(),
        )
    }
}
