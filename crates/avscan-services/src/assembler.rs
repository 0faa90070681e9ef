//! Scan record assembly and rendering.

use avscan_core::{ScanRecord, VersionInfo};
use avscan_engine::{parse_scan_transcript, ScanOutcome};
use std::fmt::{self, Write};
use std::io;
use std::path::Path;

/// Compile date (`YYYYMMDD`), used when no update stamp exists.
pub const BUILD_TIME: &str = env!("AVSCAN_BUILD_TIME");

/// Merge a scan outcome with version metadata into the final record.
///
/// A failed outcome yields an error-only record; version and date are not
/// merged in that case.
pub fn assemble(outcome: &ScanOutcome, version: VersionInfo, updated_date: String) -> ScanRecord {
    if let Some(error) = outcome.error() {
        return ScanRecord::failed(error.to_string());
    }

    let verdict = parse_scan_transcript(outcome.transcript());
    ScanRecord::new(verdict.verdicts, version, updated_date)
}

/// Date of the last definition update, falling back to `build_time`.
pub async fn updated_date(stamp_file: &Path, build_time: &str) -> String {
    match tokio::fs::read_to_string(stamp_file).await {
        Ok(contents) => contents.trim().to_string(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => build_time.to_string(),
        Err(e) => {
            tracing::warn!(
                path = %stamp_file.display(),
                error = %e,
                "Failed to read update stamp, using build time"
            );
            build_time.to_string()
        }
    }
}

/// Render the record as a markdown table. Returns an empty string on failure.
pub fn render_markdown(record: &ScanRecord) -> String {
    let mut out = String::new();
    match write_table(&mut out, record) {
        Ok(()) => out,
        Err(e) => {
            tracing::error!(error = %e, "Failed to render markdown table");
            String::new()
        }
    }
}

fn write_table<W: Write>(out: &mut W, record: &ScanRecord) -> fmt::Result {
    writeln!(out, "#### F-Secure")?;
    writeln!(out, "| Infected      | Result      | Engine      | Updated      |")?;
    writeln!(out, "|:-------------:|:-----------:|:-----------:|:------------:|")?;
    writeln!(
        out,
        "| {} | {} | {} | {} |",
        record.infected,
        record.engine_verdicts.secondary_engine,
        record.engine_version,
        record.updated_date
    )
}
