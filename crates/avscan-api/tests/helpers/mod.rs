//! Test helpers: build AppState and router around a fake scanner.
//!
//! Run from workspace root: `cargo test -p avscan-api --test scan_test`.

#![allow(dead_code)]

use async_trait::async_trait;
use avscan_api::setup::routes;
use avscan_api::state::AppState;
use avscan_core::Config;
use avscan_engine::{CommandRunner, ProcessError, ProcessOutcome, ProcessStatus, ScanInvoker};
use avscan_services::ScanOrchestrator;
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const EICAR: &[u8] = b"X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR-STANDARD-ANTIVIRUS-TEST-FILE!$H+H*";

const EICAR_TRANSCRIPT: &str = "Infected: EICAR_Test_File [FSE]\n\
                                Infected: EICAR-Test-File (not a virus) [Aquarius]\n";

const VERSION_BANNER: &str = "F-Secure Linux Security version 11.00 build 79\n\
                              Database version: 2016-09-19_01\n";

/// What the fake scanner saw when it was asked to scan a file.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Stands in for `fsav`: flags anything containing the EICAR marker.
#[derive(Default)]
pub struct FakeScanner {
    pub scanned: Mutex<Vec<ScannedFile>>,
    /// Exit status returned for every scan attempt instead of a verdict
    pub failure_status: Option<i32>,
}

impl FakeScanner {
    pub fn scanned(&self) -> Vec<ScannedFile> {
        self.scanned.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeScanner {
    async fn run(
        &self,
        _program: &Path,
        args: &[String],
        _timeout: Duration,
    ) -> Result<ProcessOutcome, ProcessError> {
        if args.iter().any(|a| a == "--version") {
            return Ok(outcome(ProcessStatus::Success, VERSION_BANNER));
        }

        let path = PathBuf::from(args.last().cloned().unwrap_or_default());
        let contents = tokio::fs::read(&path).await.unwrap_or_default();
        let infected = contents.windows(5).any(|w| w == b"EICAR");
        self.scanned
            .lock()
            .unwrap()
            .push(ScannedFile { path, contents });

        Ok(match self.failure_status {
            Some(code) => outcome(ProcessStatus::NonZeroExit(code), ""),
            None if infected => outcome(ProcessStatus::NonZeroExit(3), EICAR_TRANSCRIPT),
            None => outcome(ProcessStatus::Success, "1 file scanned\n"),
        })
    }
}

fn outcome(status: ProcessStatus, output: &str) -> ProcessOutcome {
    ProcessOutcome {
        output: output.to_string(),
        status,
    }
}

/// Test application: server, fake scanner and owned directories.
pub struct TestApp {
    pub server: TestServer,
    pub scanner: Arc<FakeScanner>,
    pub staging_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Entries left in the staging directory.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.staging_dir)
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_with_scanner(FakeScanner::default(), true).await
}

/// `create_staging` false leaves the staging directory missing.
pub async fn setup_with_scanner(scanner: FakeScanner, create_staging: bool) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let staging_dir = temp_dir.path().join("malware");
    if create_staging {
        std::fs::create_dir(&staging_dir).expect("Failed to create staging dir");
    }
    let updated_file = temp_dir.path().join("UPDATED");
    std::fs::write(&updated_file, "20240102").expect("Failed to write update stamp");

    let scanner = Arc::new(scanner);
    let invoker = ScanInvoker::new(scanner.clone(), PathBuf::from("/opt/fsav"), None);
    let orchestrator = ScanOrchestrator::new(invoker, updated_file);

    let config = Config {
        staging_dir: staging_dir.clone(),
        max_upload_size_bytes: 1024 * 1024,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(orchestrator, staging_dir.clone()));
    let app = routes::setup_routes(&config, state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        scanner,
        staging_dir,
        _temp_dir: temp_dir,
    }
}
