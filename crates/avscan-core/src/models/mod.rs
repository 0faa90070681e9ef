pub mod scan;

pub use scan::{EngineVerdicts, PluginResults, ScanRecord, ScanReport, VersionInfo};
