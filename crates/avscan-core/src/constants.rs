//! Fixed names and scanner conventions.

/// Plugin name used in log fields, the JSON wrapper key and storage documents.
pub const PLUGIN_NAME: &str = "fsecure";

/// Plugin category used in log fields and storage documents.
pub const PLUGIN_CATEGORY: &str = "av";

/// Exit status `fsav` uses to report that the scan completed and found an infection.
pub const INFECTED_EXIT_CODE: i32 = 3;

/// Argument disabling automatic remediation of infected files.
pub const VIRUS_ACTION_NONE: &str = "--virus-action1=none";

/// Engine tag appended to FSE verdict lines.
pub const PRIMARY_ENGINE_TAG: &str = "[FSE]";

/// Engine tag appended to Aquarius verdict lines.
pub const SECONDARY_ENGINE_TAG: &str = "[Aquarius]";

/// Deadline used by the HTTP upload endpoint.
pub const WEB_SCAN_TIMEOUT_SECS: u64 = 60;

/// Deadline for the definition update command.
pub const UPDATE_TIMEOUT_SECS: u64 = 600;

/// Header carrying the scan identifier on webhook deliveries.
pub const SCAN_ID_HEADER: &str = "X-Malice-ID";

/// Multipart field carrying the uploaded sample.
pub const UPLOAD_FIELD_NAME: &str = "malware";

/// Prefix of staged upload files.
pub const STAGING_FILE_PREFIX: &str = "web_";
