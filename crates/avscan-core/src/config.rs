//! Configuration module
//!
//! Runtime settings for the scanner binaries, the staging area, the web
//! service and the optional storage/webhook collaborators. Values come from
//! the environment (and a `.env` file when present).

use std::env;
use std::path::PathBuf;

const DEFAULT_FSAV_PATH: &str = "/opt/f-secure/fsav/bin/fsav";
const DEFAULT_FSAVD_PATH: &str = "/opt/f-secure/fsav/bin/fsavd";
const DEFAULT_UPDATE_COMMAND: &str = "/opt/malice/update";
const DEFAULT_UPDATED_FILE: &str = "/opt/malice/UPDATED";
const DEFAULT_STAGING_DIR: &str = "/malware";
const DEFAULT_PORT: u16 = 3993;
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct Config {
    /// Scanner client binary
    pub fsav_path: PathBuf,
    /// Scanner daemon started before the version query; `None` disables it
    pub fsavd_path: Option<PathBuf>,
    pub update_command: PathBuf,
    /// Stamp file recording the last successful definition update
    pub updated_file: PathBuf,
    pub staging_dir: PathBuf,
    pub server_port: u16,
    pub max_upload_size_bytes: usize,
    pub timeout_secs: u64,
    pub elasticsearch_url: Option<String>,
    pub webhook_endpoint: Option<String>,
    pub webhook_proxy: Option<String>,
    pub scan_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fsav_path: PathBuf::from(DEFAULT_FSAV_PATH),
            fsavd_path: Some(PathBuf::from(DEFAULT_FSAVD_PATH)),
            update_command: PathBuf::from(DEFAULT_UPDATE_COMMAND),
            updated_file: PathBuf::from(DEFAULT_UPDATED_FILE),
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            server_port: DEFAULT_PORT,
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            elasticsearch_url: None,
            webhook_endpoint: None,
            webhook_proxy: None,
            scan_id: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let fsavd_path = match env::var("FSAVD_PATH") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => defaults.fsavd_path,
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let config = Config {
            fsav_path: env_path("FSAV_PATH").unwrap_or(defaults.fsav_path),
            fsavd_path,
            update_command: env_path("AVSCAN_UPDATE_COMMAND").unwrap_or(defaults.update_command),
            updated_file: env_path("AVSCAN_UPDATED_FILE").unwrap_or(defaults.updated_file),
            staging_dir: env_path("AVSCAN_STAGING_DIR").unwrap_or(defaults.staging_dir),
            server_port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            timeout_secs: env::var("MALICE_TIMEOUT")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            elasticsearch_url: env_string("MALICE_ELASTICSEARCH_URL"),
            webhook_endpoint: env_string("MALICE_ENDPOINT"),
            webhook_proxy: env_string("MALICE_PROXY"),
            scan_id: env_string("MALICE_SCANID"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.fsav_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("FSAV_PATH cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!("MALICE_TIMEOUT must be greater than zero"));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }
        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_string(key).map(PathBuf::from)
}
