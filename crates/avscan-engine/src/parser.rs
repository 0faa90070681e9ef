//! Transcript parsers.
//!
//! Both parsers are total: malformed input degrades to empty fields and never
//! produces an error.
//!
//! Scan transcript (`fsav --virus-action1=none eicar.com.txt`):
//!
//! ```text
//! F-Secure Anti-Virus CLI version 1.0  build 0060
//!
//! Scan started at Mon Aug 22 02:43:50 2016
//! Database version: 2016-08-22_01
//!
//! eicar.com.txt: Infected: EICAR_Test_File [FSE]
//! eicar.com.txt: Infected: EICAR-Test-File (not a virus) [Aquarius]
//!
//! Scan ended at Mon Aug 22 02:43:50 2016
//! 1 file scanned
//! 1 file infected
//! ```

use avscan_core::constants::{PRIMARY_ENGINE_TAG, SECONDARY_ENGINE_TAG};
use avscan_core::{EngineVerdicts, VersionInfo};

const INFECTED_MARKER: &str = "Infected:";
const ENGINE_VERSION_MARKER: &str = "F-Secure Linux Security version";
const DATABASE_VERSION_MARKER: &str = "Database version:";

/// Parsed scan transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanVerdict {
    pub infected: bool,
    pub verdicts: EngineVerdicts,
}

pub fn parse_scan_transcript(text: &str) -> ScanVerdict {
    let mut verdict = ScanVerdict::default();

    for line in text.lines() {
        if let Some(label) = extract_verdict(line, PRIMARY_ENGINE_TAG) {
            verdict.infected = true;
            verdict.verdicts.primary_engine = label;
            continue;
        }
        if let Some(label) = extract_verdict(line, SECONDARY_ENGINE_TAG) {
            verdict.infected = true;
            verdict.verdicts.secondary_engine = label;
        }
    }

    verdict
}

/// Text between `Infected:` and `tag`, trimmed.
fn extract_verdict(line: &str, tag: &str) -> Option<String> {
    let (_, after) = line.split_once(INFECTED_MARKER)?;
    let end = after.find(tag)?;
    Some(after[..end].trim().to_string())
}

/// Parse an `fsav --version` banner.
///
/// ```text
/// F-Secure Linux Security version 11.00 build 79
/// ...
/// Database version: 2016-09-19_01
/// ```
pub fn parse_version_transcript(text: &str) -> VersionInfo {
    let mut engine_version: Option<String> = None;
    let mut database_version: Option<String> = None;

    for line in text.lines() {
        if engine_version.is_none() {
            if let Some(idx) = line.find(ENGINE_VERSION_MARKER) {
                engine_version = Some(line[idx + ENGINE_VERSION_MARKER.len()..].trim().to_string());
            }
        }

        if database_version.is_none() && line.contains(DATABASE_VERSION_MARKER) {
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() == 2 {
                database_version = Some(parts[1].trim().to_string());
            } else {
                tracing::warn!(line = %line, segments = parts.len(), "Unexpected database version line");
            }
        }

        if engine_version.is_some() && database_version.is_some() {
            break;
        }
    }

    VersionInfo {
        engine_version: engine_version.unwrap_or_default(),
        database_version: database_version.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EICAR: &str = "eicar.com.txt: Infected: EICAR_Test_File [FSE]\n\
                         eicar.com.txt: Infected: EICAR-Test-File (not a virus) [Aquarius]";

    const CLEAN: &str = "F-Secure Anti-Virus CLI version 1.0  build 0060\n\
                         \n\
                         Scan started at Mon Aug 22 02:43:50 2016\n\
                         Database version: 2016-08-22_01\n\
                         \n\
                         Scan ended at Mon Aug 22 02:43:50 2016\n\
                         1 file scanned\n";

    const VERSION_BANNER: &str = "EVALUATION VERSION - FULLY FUNCTIONAL - FREE TO USE FOR 30 DAYS.
To purchase license, please check http://www.F-Secure.com/purchase/

F-Secure Linux Security version 11.00 build 79

F-Secure Anti-Virus CLI Command line client version:
\tF-Secure Anti-Virus CLI version 1.0  build 0060

F-Secure Anti-Virus CLI Daemon version:
\tF-Secure Anti-Virus Daemon version 1.0  build 0117

Database version: 2016-09-19_01

Scanner Engine versions:
\tF-Secure Corporation Hydra engine version 5.15 build 154
\tF-Secure Corporation Hydra database version 2016-09-16_01

\tF-Secure Corporation Aquarius engine version 1.0 build 3
\tF-Secure Corporation Aquarius database version 2016-09-19_01
";

    #[test]
    fn test_parse_eicar_transcript() {
        let verdict = parse_scan_transcript(EICAR);
        assert!(verdict.infected);
        assert_eq!(verdict.verdicts.primary_engine, "EICAR_Test_File");
        assert_eq!(
            verdict.verdicts.secondary_engine,
            "EICAR-Test-File (not a virus)"
        );
        assert_eq!(
            verdict.verdicts.summary(),
            "EICAR-Test-File (not a virus) EICAR_Test_File"
        );
    }

    #[test]
    fn test_parse_clean_transcript() {
        let first = parse_scan_transcript(CLEAN);
        assert!(!first.infected);
        assert_eq!(first.verdicts, EngineVerdicts::default());
        assert_eq!(parse_scan_transcript(CLEAN), first);
    }

    #[test]
    fn test_parse_primary_only() {
        let verdict = parse_scan_transcript("sample: Infected: Trojan.Generic.123 [FSE]\n");
        assert!(verdict.infected);
        assert_eq!(verdict.verdicts.primary_engine, "Trojan.Generic.123");
        assert!(verdict.verdicts.secondary_engine.is_empty());
    }

    #[test]
    fn test_parse_secondary_does_not_touch_primary() {
        let verdict = parse_scan_transcript(
            "a: Infected: First [FSE]\nb: Infected: Other (not a virus) [Aquarius]\n",
        );
        assert_eq!(verdict.verdicts.primary_engine, "First");
        assert_eq!(verdict.verdicts.secondary_engine, "Other (not a virus)");
    }

    #[test]
    fn test_parse_ignores_untagged_lines() {
        let verdict = parse_scan_transcript("sample: Infected: Something [Unknown]\n1 file infected");
        assert!(!verdict.infected);
    }

    #[test]
    fn test_parse_crlf_transcript() {
        let verdict = parse_scan_transcript("eicar: Infected: EICAR_Test_File [FSE]\r\n");
        assert_eq!(verdict.verdicts.primary_engine, "EICAR_Test_File");
    }

    #[test]
    fn test_parse_empty_transcript() {
        assert_eq!(parse_scan_transcript(""), ScanVerdict::default());
    }

    #[test]
    fn test_parse_version_banner() {
        let version = parse_version_transcript(VERSION_BANNER);
        assert_eq!(version.engine_version, "11.00 build 79");
        assert_eq!(version.database_version, "2016-09-19_01");
    }

    #[test]
    fn test_parse_version_missing_database() {
        let version = parse_version_transcript("F-Secure Linux Security version 11.00 build 79\n");
        assert_eq!(version.engine_version, "11.00 build 79");
        assert_eq!(version.database_version, "");
    }

    #[test]
    fn test_parse_version_malformed_database_line() {
        let version = parse_version_transcript(
            "Database version: 2016:09:19\nDatabase version: 2016-09-19_01\n",
        );
        assert_eq!(version.database_version, "2016-09-19_01");
    }

    #[test]
    fn test_parse_version_garbage() {
        assert_eq!(parse_version_transcript("\u{0}\u{1}garbage"), VersionInfo::default());
    }
}
