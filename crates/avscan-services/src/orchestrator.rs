//! End-to-end scan pipeline: invoke, parse, assemble.

use crate::assembler::{assemble, updated_date, BUILD_TIME};
use avscan_core::constants::{PLUGIN_CATEGORY, PLUGIN_NAME};
use avscan_core::{Config, ScanRecord};
use avscan_engine::{parse_version_transcript, ScanInvoker};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone)]
pub struct ScanOrchestrator {
    invoker: ScanInvoker,
    updated_file: PathBuf,
    build_time: String,
}

impl ScanOrchestrator {
    pub fn new(invoker: ScanInvoker, updated_file: PathBuf) -> Self {
        Self {
            invoker,
            updated_file,
            build_time: BUILD_TIME.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ScanInvoker::from_config(config), config.updated_file.clone())
    }

    /// Scan `path` and assemble the structured record.
    ///
    /// Never fails: scanner errors are carried in the record's error field.
    /// The version banner is fetched once per call, after a successful scan,
    /// within whatever remains of `timeout`.
    #[tracing::instrument(
        skip(self, path),
        fields(plugin = PLUGIN_NAME, category = PLUGIN_CATEGORY, path = %path.display())
    )]
    pub async fn scan_file(&self, path: &Path, timeout: Duration) -> ScanRecord {
        let deadline = Instant::now() + timeout;
        let outcome = self.invoker.scan(path, timeout).await;
        if outcome.error().is_some() {
            return assemble(&outcome, Default::default(), String::new());
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        let version = match self.invoker.version(remaining).await {
            Ok(banner) => parse_version_transcript(&banner),
            Err(e) => {
                tracing::error!(error = %e, "Failed to query scanner version");
                return ScanRecord::failed(format!("failed to get scanner version: {}", e));
            }
        };

        let updated = updated_date(&self.updated_file, &self.build_time).await;
        let record = assemble(&outcome, version, updated);

        tracing::info!(
            infected = record.infected,
            result = %record.result_summary,
            "Scan completed"
        );
        record
    }
}
