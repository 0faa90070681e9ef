//! Virus definition updates.

use avscan_core::constants::UPDATE_TIMEOUT_SECS;
use avscan_core::{Config, ScanError};
use avscan_engine::{ProcessRunner, ProcessStatus};
use chrono::Local;
use std::path::PathBuf;
use std::time::Duration;

/// Runs the external update command and records the update date.
#[derive(Debug, Clone)]
pub struct DefinitionUpdater {
    runner: ProcessRunner,
    command: PathBuf,
    args: Vec<String>,
    updated_file: PathBuf,
    timeout: Duration,
}

impl DefinitionUpdater {
    pub fn new(command: PathBuf, args: Vec<String>, updated_file: PathBuf) -> Self {
        Self {
            runner: ProcessRunner::new(),
            command,
            args,
            updated_file,
            timeout: Duration::from_secs(UPDATE_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.update_command.clone(),
            Vec::new(),
            config.updated_file.clone(),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the update, relaying each output line to `sink`, then write the stamp file.
    #[tracing::instrument(skip(self, sink), fields(command = %self.command.display()))]
    pub async fn update<F>(&self, sink: F) -> Result<(), ScanError>
    where
        F: FnMut(&str) + Send,
    {
        let status = self
            .runner
            .stream(&self.command, &self.args, self.timeout, sink)
            .await?;

        match status {
            ProcessStatus::Success => {}
            ProcessStatus::NonZeroExit(code) => return Err(ScanError::ProcessNonZeroExit(code)),
            ProcessStatus::Timeout => {
                return Err(ScanError::ProcessTimeout(self.timeout.as_secs()))
            }
        }

        let stamp = Local::now().format("%Y%m%d").to_string();
        tokio::fs::write(&self.updated_file, &stamp).await?;
        tracing::info!(updated = %stamp, "Virus definitions updated");
        Ok(())
    }
}
