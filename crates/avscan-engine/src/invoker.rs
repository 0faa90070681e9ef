//! `fsav` invocation policy.
//!
//! `fsav` reports an infected file through exit status 3, so exit-status
//! interpretation lives here rather than in the transcript parser. A failed
//! attempt (anything other than success or the infected status) is retried
//! exactly once with identical arguments; the retry shares the deadline of
//! the first attempt.

use crate::process::{CommandRunner, ProcessOutcome, ProcessRunner, ProcessStatus};
use avscan_core::constants::{INFECTED_EXIT_CODE, PLUGIN_CATEGORY, PLUGIN_NAME, VIRUS_ACTION_NONE};
use avscan_core::{Config, ScanError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound for the best-effort daemon start before a version query.
const DAEMON_START_TIMEOUT: Duration = Duration::from_secs(10);

/// Classified result of a single scanner attempt.
#[derive(Debug)]
pub enum Invocation {
    Success,
    /// Non-zero exit that carries a verdict rather than a fault
    DomainSignal(i32),
    Failure(ScanError),
}

impl Invocation {
    fn from_outcome(outcome: &ProcessOutcome, timeout: Duration) -> Self {
        match outcome.status {
            ProcessStatus::Success => Invocation::Success,
            ProcessStatus::NonZeroExit(INFECTED_EXIT_CODE) => {
                Invocation::DomainSignal(INFECTED_EXIT_CODE)
            }
            ProcessStatus::NonZeroExit(code) => {
                Invocation::Failure(ScanError::ProcessNonZeroExit(code))
            }
            ProcessStatus::Timeout => Invocation::Failure(ScanError::ProcessTimeout(timeout.as_secs())),
        }
    }
}

/// Final result of [`ScanInvoker::scan`].
#[derive(Debug)]
pub enum ScanOutcome {
    Completed { transcript: String },
    Failed { transcript: String, error: ScanError },
}

impl ScanOutcome {
    pub fn transcript(&self) -> &str {
        match self {
            ScanOutcome::Completed { transcript } | ScanOutcome::Failed { transcript, .. } => {
                transcript
            }
        }
    }

    pub fn error(&self) -> Option<&ScanError> {
        match self {
            ScanOutcome::Completed { .. } => None,
            ScanOutcome::Failed { error, .. } => Some(error),
        }
    }
}

#[derive(Clone)]
pub struct ScanInvoker {
    runner: Arc<dyn CommandRunner>,
    fsav_path: PathBuf,
    fsavd_path: Option<PathBuf>,
}

impl ScanInvoker {
    pub fn new(runner: Arc<dyn CommandRunner>, fsav_path: PathBuf, fsavd_path: Option<PathBuf>) -> Self {
        Self {
            runner,
            fsav_path,
            fsavd_path,
        }
    }

    /// Invoker running real processes with the binaries named in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ProcessRunner::new()),
            config.fsav_path.clone(),
            config.fsavd_path.clone(),
        )
    }

    /// Scan `path`, retrying once on failure.
    #[tracing::instrument(
        skip(self, path),
        fields(plugin = PLUGIN_NAME, category = PLUGIN_CATEGORY, path = %path.display())
    )]
    pub async fn scan(&self, path: &Path, timeout: Duration) -> ScanOutcome {
        let deadline = Instant::now() + timeout;
        let args = vec![
            VIRUS_ACTION_NONE.to_string(),
            path.to_string_lossy().into_owned(),
        ];

        let (transcript, first) = self.attempt(&args, deadline, timeout).await;
        tracing::debug!(output = %transcript, "FSecure output 1st try");

        let (transcript, invocation) = match first {
            Invocation::Failure(error) => {
                tracing::warn!(error = %error, "Scan attempt failed, retrying once");
                let (transcript, second) = self.attempt(&args, deadline, timeout).await;
                tracing::debug!(output = %transcript, "FSecure output 2nd try");
                (transcript, second)
            }
            other => (transcript, other),
        };

        match invocation {
            Invocation::Success => ScanOutcome::Completed { transcript },
            Invocation::DomainSignal(code) => {
                tracing::debug!(exit_code = code, "Scanner signalled an infected file");
                ScanOutcome::Completed { transcript }
            }
            Invocation::Failure(error) => {
                tracing::error!(error = %error, "Scan failed after retry");
                ScanOutcome::Failed {
                    transcript,
                    error: ScanError::ScanFailed(error.to_string()),
                }
            }
        }
    }

    /// Raw `fsav --version` banner.
    #[tracing::instrument(skip(self), fields(plugin = PLUGIN_NAME, category = PLUGIN_CATEGORY))]
    pub async fn version(&self, timeout: Duration) -> Result<String, ScanError> {
        self.start_daemon(timeout.min(DAEMON_START_TIMEOUT)).await;

        let outcome = self
            .runner
            .run(&self.fsav_path, &["--version".to_string()], timeout)
            .await?;

        match outcome.status {
            ProcessStatus::Success => Ok(outcome.output),
            ProcessStatus::NonZeroExit(code) => Err(ScanError::ProcessNonZeroExit(code)),
            ProcessStatus::Timeout => Err(ScanError::ProcessTimeout(timeout.as_secs())),
        }
    }

    async fn attempt(
        &self,
        args: &[String],
        deadline: Instant,
        timeout: Duration,
    ) -> (String, Invocation) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match self.runner.run(&self.fsav_path, args, remaining).await {
            Ok(outcome) => {
                let invocation = Invocation::from_outcome(&outcome, timeout);
                (outcome.output, invocation)
            }
            Err(e) => (String::new(), Invocation::Failure(e.into())),
        }
    }

    async fn start_daemon(&self, timeout: Duration) {
        let Some(fsavd) = &self.fsavd_path else {
            return;
        };
        match self.runner.run(fsavd, &[], timeout).await {
            Ok(outcome) if outcome.status == ProcessStatus::Success => {
                tracing::debug!("Scanner daemon started");
            }
            Ok(outcome) => {
                tracing::debug!(status = ?outcome.status, "Scanner daemon start did not succeed");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Could not start scanner daemon");
            }
        }
    }
}
