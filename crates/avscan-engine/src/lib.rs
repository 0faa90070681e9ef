//! avscan Engine Library
//!
//! Runs the external `fsav` scanner and turns its text output into
//! structured values:
//! - `process`: bounded process execution (kill and reap on deadline)
//! - `invoker`: scan retry policy and infected-exit-code handling
//! - `parser`: total parsers for scan and version transcripts

pub mod invoker;
pub mod parser;
pub mod process;

pub use invoker::{Invocation, ScanInvoker, ScanOutcome};
pub use parser::{parse_scan_transcript, parse_version_transcript, ScanVerdict};
pub use process::{CommandRunner, ProcessError, ProcessOutcome, ProcessRunner, ProcessStatus};
