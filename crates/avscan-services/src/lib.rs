//! avscan Services Layer
//!
//! Orchestration on top of the engine: assembling scan records, rendering
//! the summary table, the end-to-end scan pipeline and the definition
//! updater. Thin HTTP and CLI handling stays in avscan-api / avscan-cli.

pub mod assembler;
pub mod orchestrator;
pub mod updater;

pub use assembler::{assemble, render_markdown, updated_date, BUILD_TIME};
pub use orchestrator::ScanOrchestrator;
pub use updater::DefinitionUpdater;
