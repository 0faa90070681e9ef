use serde::{Deserialize, Serialize};

use crate::constants::{PLUGIN_CATEGORY, PLUGIN_NAME};

/// Verdict label per sub-engine; empty when that engine reported nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineVerdicts {
    #[serde(rename = "fse")]
    pub primary_engine: String,
    #[serde(rename = "aquarius")]
    pub secondary_engine: String,
}

impl EngineVerdicts {
    pub fn new(primary_engine: impl Into<String>, secondary_engine: impl Into<String>) -> Self {
        Self {
            primary_engine: primary_engine.into(),
            secondary_engine: secondary_engine.into(),
        }
    }

    /// True when at least one sub-engine produced a verdict.
    pub fn any_detection(&self) -> bool {
        !self.primary_engine.is_empty() || !self.secondary_engine.is_empty()
    }

    /// Secondary verdict then primary verdict, space-joined and trimmed.
    pub fn summary(&self) -> String {
        format!("{} {}", self.secondary_engine, self.primary_engine)
            .trim()
            .to_string()
    }
}

/// Scanner engine and signature database versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub engine_version: String,
    pub database_version: String,
}

/// Structured verdict for one scanned file.
///
/// A record either carries scan data or an error message, never both:
/// build it through [`ScanRecord::new`] or [`ScanRecord::failed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub infected: bool,
    #[serde(rename = "result")]
    pub result_summary: String,
    #[serde(rename = "results")]
    pub engine_verdicts: EngineVerdicts,
    #[serde(rename = "engine")]
    pub engine_version: String,
    #[serde(rename = "database")]
    pub database_version: String,
    #[serde(rename = "updated")]
    pub updated_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ScanRecord {
    pub fn new(verdicts: EngineVerdicts, version: VersionInfo, updated_date: String) -> Self {
        Self {
            infected: verdicts.any_detection(),
            result_summary: verdicts.summary(),
            engine_verdicts: verdicts,
            engine_version: version.engine_version,
            database_version: version.database_version,
            updated_date,
            markdown: None,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn with_markdown(mut self, markdown: String) -> Self {
        self.markdown = Some(markdown);
        self
    }

    pub fn without_markdown(mut self) -> Self {
        self.markdown = None;
        self
    }
}

/// JSON envelope emitted by the CLI, the HTTP endpoint and the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub fsecure: ScanRecord,
}

impl From<ScanRecord> for ScanReport {
    fn from(record: ScanRecord) -> Self {
        Self { fsecure: record }
    }
}

/// Document handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginResults {
    pub id: String,
    pub name: String,
    pub category: String,
    pub data: ScanRecord,
}

impl PluginResults {
    /// Wrap a record for storage; the rendered table is never persisted.
    pub fn new(id: impl Into<String>, record: ScanRecord) -> Self {
        Self {
            id: id.into(),
            name: PLUGIN_NAME.to_string(),
            category: PLUGIN_CATEGORY.to_string(),
            data: record.without_markdown(),
        }
    }
}
