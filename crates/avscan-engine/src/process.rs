//! Bounded execution of external commands.

use async_trait::async_trait;
use avscan_core::ScanError;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};

/// How a finished (or abandoned) process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Success,
    NonZeroExit(i32),
    Timeout,
}

/// Raw result of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Captured stdout followed by captured stderr
    pub output: String,
    pub status: ProcessStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl From<ProcessError> for ScanError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Spawn { program, source } => ScanError::Spawn {
                program,
                message: source.to_string(),
            },
            ProcessError::Wait { source, .. } => ScanError::Io(source),
        }
    }
}

/// Runs a command to completion or until the deadline elapses.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutcome, ProcessError>;
}

/// [`CommandRunner`] backed by real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run a command, handing each stdout line to `sink` as soon as it is read.
    ///
    /// Stderr is inherited so the operator sees it directly.
    pub async fn stream<F>(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
        mut sink: F,
    ) -> Result<ProcessStatus, ProcessError>
    where
        F: FnMut(&str) + Send,
    {
        let mut child = spawn(program, args, Stdio::inherit())?;
        let stdout = child.stdout.take();

        let relay = async {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Some(line) = lines.next_line().await? {
                    sink(&line);
                }
            }
            child.wait().await
        };

        let result = tokio::time::timeout(timeout, relay).await;
        match result {
            Ok(Ok(status)) => Ok(classify(status)),
            Ok(Err(source)) => Err(ProcessError::Wait {
                program: display(program),
                source,
            }),
            Err(_) => {
                kill_and_reap(&mut child, program).await;
                Ok(ProcessStatus::Timeout)
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    #[tracing::instrument(skip(self, program, args), fields(program = %program.display()))]
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutcome, ProcessError> {
        let mut child = spawn(program, args, Stdio::piped())?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let collect = async {
            let (out, err, status) =
                tokio::join!(read_all(stdout), read_all(stderr), child.wait());
            Ok::<_, io::Error>((out?, err?, status?))
        };

        let result = tokio::time::timeout(timeout, collect).await;
        match result {
            Ok(Ok((out, err, status))) => {
                let mut output = String::from_utf8_lossy(&out).into_owned();
                output.push_str(&String::from_utf8_lossy(&err));
                Ok(ProcessOutcome {
                    output,
                    status: classify(status),
                })
            }
            Ok(Err(source)) => Err(ProcessError::Wait {
                program: display(program),
                source,
            }),
            Err(_) => {
                kill_and_reap(&mut child, program).await;
                Ok(ProcessOutcome {
                    output: String::new(),
                    status: ProcessStatus::Timeout,
                })
            }
        }
    }
}

fn spawn(program: &Path, args: &[String], stderr: Stdio) -> Result<Child, ProcessError> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(stderr)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: display(program),
            source,
        })
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kill the child and wait for it so no zombie is left behind.
async fn kill_and_reap(child: &mut Child, program: &Path) {
    tracing::warn!(program = %program.display(), "Deadline exceeded, killing process");
    if let Err(e) = child.kill().await {
        tracing::error!(program = %program.display(), error = %e, "Failed to kill process");
    }
}

fn classify(status: ExitStatus) -> ProcessStatus {
    if status.success() {
        ProcessStatus::Success
    } else {
        // Killed by a signal: no exit code available
        ProcessStatus::NonZeroExit(status.code().unwrap_or(-1))
    }
}

fn display(program: &Path) -> String {
    program.display().to_string()
}
